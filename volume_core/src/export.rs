use crate::{amounts::round_display_amount, AnalysisError, CanonicalTransaction, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Column order of the transaction export
pub const CSV_HEADERS: [&str; 10] = [
    "tx_id",
    "timestamp",
    "from_token",
    "from_chain",
    "from_amount",
    "to_token",
    "to_chain",
    "to_amount",
    "usd_value",
    "platform",
];

/// Write one row per transaction, with a header row, to any writer.
pub fn write_csv<W: Write>(writer: W, transactions: &[CanonicalTransaction]) -> Result<W> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(CSV_HEADERS)?;

    for tx in transactions {
        wtr.write_record([
            tx.tx_id.clone(),
            tx.timestamp.to_string(),
            tx.from_token.clone(),
            tx.from_chain.clone(),
            round_display_amount(tx.from_amount).to_string(),
            tx.to_token.clone(),
            tx.to_chain.clone(),
            round_display_amount(tx.to_amount).to_string(),
            tx.usd_value.normalize().to_string(),
            tx.platform.clone(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| AnalysisError::Io(e.into_error()))
}

/// Render the export as a UTF-8 string
pub fn export_csv_string(transactions: &[CanonicalTransaction]) -> Result<String> {
    let buffer = write_csv(Vec::new(), transactions)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the export to `path`, replacing any existing file
pub fn write_csv_file<P: AsRef<Path>>(path: P, transactions: &[CanonicalTransaction]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut file = write_csv(file, transactions)?;
    file.flush()?;

    info!(
        "💾 Exported {} transactions to {}",
        transactions.len(),
        path.as_ref().display()
    );
    Ok(())
}
