use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use config_manager::SystemConfig;
use job_orchestrator::{PipelineError, TransferPipeline};
use lifi_client::{validate_wallet_address, LifiClient, LifiClientConfig};
use std::path::PathBuf;
use tracing::{debug, error, warn};
use volume_core::{
    time::{first_day_of_month, parse_since_date},
    write_csv_file,
};

mod report;

/// Bridge and swap volume of a wallet's Jumper transfers
#[derive(Parser, Debug)]
#[command(name = "jumper_volume", version)]
struct Cli {
    /// Wallet address (0x...)
    #[arg(short, long)]
    wallet: String,

    /// Start date as YYYY-MM-DD; defaults to the first day of the current month (UTC)
    #[arg(short, long)]
    since: Option<String>,

    /// Export transactions as CSV, to PATH or to the configured output directory
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    csv: Option<Option<PathBuf>>,

    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Transfers requested per page
    #[arg(long)]
    page_limit: Option<u32>,
}

fn init_tracing(debug_mode: bool) {
    let default_filter = if debug_mode {
        "debug"
    } else {
        "info,jumper_volume=debug"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SystemConfig::load_from_path(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(page_limit) = cli.page_limit {
        config.lifi.page_limit = page_limit;
        config.validate()?;
    }

    init_tracing(config.system.debug_mode);
    debug!("Effective configuration: {}", config.to_json_value());

    let wallet = cli.wallet.trim();
    validate_wallet_address(wallet)?;

    let today = Utc::now().date_naive();
    let since = match cli.since.as_deref() {
        Some(raw) => parse_since_date(raw)
            .with_context(|| format!("Invalid --since date '{}', expected YYYY-MM-DD", raw))?,
        None => first_day_of_month(today),
    };
    if since > today {
        bail!("--since {} is in the future", since);
    }

    let client = LifiClient::with_config(LifiClientConfig::from(&config))?;
    let pipeline = TransferPipeline::from_config(client.clone(), client, &config);

    let analysis = match pipeline.analyze_wallet(wallet, since).await {
        Ok(analysis) => analysis,
        Err(PipelineError::MetadataUnavailable(reason)) => {
            error!("❌ Chain list unavailable: {}", reason);
            bail!("Could not retrieve the chain list, aborting: {}", reason);
        }
        Err(PipelineError::NoData { interrupted: true }) => {
            warn!("Transfer API failed before any usable transfer was received");
            println!(
                "❌ No transactions retrieved for {}: the transfer API failed, try again later",
                wallet
            );
            return Ok(());
        }
        Err(PipelineError::NoData { interrupted: false }) => {
            println!("❌ No transactions found for {} since {}", wallet, since);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", report::render_report(&analysis, Utc::now()));

    if let Some(target) = cli.csv {
        let path = target.unwrap_or_else(|| {
            report::default_export_path(&config.export.output_dir, wallet, since)
        });

        write_csv_file(&path, &analysis.stats.transactions)
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
        println!("💾 CSV written to {}", path.display());
    }

    Ok(())
}
