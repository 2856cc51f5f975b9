pub mod aggregator;
pub mod amounts;
pub mod export;
pub mod time;

pub use aggregator::{AggregateStats, PlatformShare, UNKNOWN_PLATFORM};
pub use amounts::{
    format_usd, format_usd_total, parse_raw_amount, round_display_amount, scale_raw_amount,
    zero_display_amount, DISPLAY_DECIMALS,
};
pub use export::{export_csv_string, write_csv, write_csv_file, CSV_HEADERS};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No transactions to analyze")]
    Empty,
    #[error("CSV export error: {0}")]
    Export(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Classification of a transfer by its source and destination chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferKind {
    /// Source and destination chains differ
    Bridge,
    /// Source and destination chains are the same
    Swap,
}

impl TransferKind {
    /// Compares resolved chain display names, not chain ids
    pub fn classify(from_chain: &str, to_chain: &str) -> Self {
        if from_chain == to_chain {
            TransferKind::Swap
        } else {
            TransferKind::Bridge
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::Bridge => "bridge",
            TransferKind::Swap => "swap",
        }
    }
}

/// A single transfer flattened out of the analytics API response.
///
/// Amounts carry exactly four fractional digits; `usd_value` keeps the
/// precision of the leg it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    /// Shortened transaction hash, e.g. `0xabcd...ef01`
    pub tx_id: String,

    /// Unix seconds
    pub timestamp: i64,

    pub from_token: String,
    pub from_chain: String,
    pub from_amount: Decimal,

    pub to_token: String,
    pub to_chain: String,
    pub to_amount: Decimal,

    pub usd_value: Decimal,

    /// Bridge or exchange tool reported by the API, empty if absent
    pub platform: String,
}

impl CanonicalTransaction {
    pub fn kind(&self) -> TransferKind {
        TransferKind::classify(&self.from_chain, &self.to_chain)
    }

    /// Records without an id or either token symbol are not kept
    pub fn is_retainable(&self) -> bool {
        !self.tx_id.is_empty() && !self.from_token.is_empty() && !self.to_token.is_empty()
    }
}

/// Display form of a transaction hash: first 6 and last 4 characters.
pub fn shorten_tx_hash(hash: &str) -> String {
    if hash.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = hash.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{}...{}", head, tail)
}
