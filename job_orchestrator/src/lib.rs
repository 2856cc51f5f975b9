use chrono::{NaiveDate, Utc};
use config_manager::SystemConfig;
use lifi_client::{
    ChainDirectory, ChainListSource, FetchInterruption, LifiError, RecordNormalizer,
    TransferFetcher, TransferPageSource, DEFAULT_PAGE_DELAY, DEFAULT_PAGE_LIMIT,
};
use std::cmp::Reverse;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use volume_core::{time::day_start_timestamp, AggregateStats, CanonicalTransaction};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Chain metadata unavailable: {0}")]
    MetadataUnavailable(String),
    #[error("No transactions found{}", interruption_note(.interrupted))]
    NoData { interrupted: bool },
    #[error("Transfer API error: {0}")]
    Api(String),
    #[error("Analysis error: {0}")]
    Analysis(String),
}

impl From<LifiError> for PipelineError {
    fn from(err: LifiError) -> Self {
        match err {
            LifiError::MetadataUnavailable { reason } => PipelineError::MetadataUnavailable(reason),
            other => PipelineError::Api(other.to_string()),
        }
    }
}

impl From<volume_core::AnalysisError> for PipelineError {
    fn from(err: volume_core::AnalysisError) -> Self {
        PipelineError::Analysis(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

fn interruption_note(interrupted: &bool) -> &'static str {
    if *interrupted {
        " (fetch was interrupted)"
    } else {
        ""
    }
}

/// Counters describing one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub pages_fetched: u32,
    /// Raw records received across all pages
    pub fetched: usize,
    /// Normalized but missing a hash or a token symbol
    pub dropped: usize,
    /// Could not be normalized at all
    pub malformed: usize,
    pub interruption: Option<FetchInterruption>,
}

impl FetchSummary {
    pub fn is_partial(&self) -> bool {
        self.interruption.is_some()
    }
}

/// Retained transactions, most recent first, plus run counters
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub transactions: Vec<CanonicalTransaction>,
    pub summary: FetchSummary,
}

/// Aggregated statistics for a wallet together with how they were obtained
#[derive(Debug, Clone)]
pub struct WalletAnalysis {
    pub stats: AggregateStats,
    pub summary: FetchSummary,
}

/// Chain list, paginated fetch, normalization and aggregation for one wallet.
///
/// The wallet is always passed per call; the pipeline holds no per-run state
/// and can be reused for any number of wallets.
pub struct TransferPipeline<T, C> {
    transfers: T,
    chains: C,
    page_limit: u32,
    page_delay: Duration,
}

impl<T, C> TransferPipeline<T, C>
where
    T: TransferPageSource,
    C: ChainListSource,
{
    pub fn new(transfers: T, chains: C) -> Self {
        Self {
            transfers,
            chains,
            page_limit: DEFAULT_PAGE_LIMIT,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Page size and inter-page delay taken from the `lifi` config section
    pub fn from_config(transfers: T, chains: C, config: &SystemConfig) -> Self {
        Self::new(transfers, chains)
            .with_page_limit(config.lifi.page_limit)
            .with_page_delay(Duration::from_millis(config.lifi.page_delay_ms))
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn transfers(&self) -> &T {
        &self.transfers
    }

    pub async fn load_chains(&self) -> Result<ChainDirectory> {
        Ok(ChainDirectory::load(&self.chains).await?)
    }

    /// Transfers from midnight UTC of `since` until now
    pub async fn run(
        &self,
        wallet: &str,
        since: NaiveDate,
        chains: &ChainDirectory,
    ) -> PipelineReport {
        let from_timestamp = day_start_timestamp(since);
        let to_timestamp = Utc::now().timestamp();
        self.run_window(wallet, from_timestamp, to_timestamp, chains)
            .await
    }

    pub async fn run_window(
        &self,
        wallet: &str,
        from_timestamp: i64,
        to_timestamp: i64,
        chains: &ChainDirectory,
    ) -> PipelineReport {
        let fetched = TransferFetcher::new(&self.transfers)
            .with_page_delay(self.page_delay)
            .fetch_all(wallet, from_timestamp, to_timestamp, self.page_limit)
            .await;

        let mut summary = FetchSummary {
            pages_fetched: fetched.pages_fetched,
            fetched: fetched.records.len(),
            interruption: fetched.interruption,
            ..FetchSummary::default()
        };

        // Ordered on the raw sending timestamp, before any leg fallback
        let mut records = fetched.records;
        records.sort_by_key(|record| Reverse(record.sort_timestamp()));

        let normalizer = RecordNormalizer::new(chains);
        let mut transactions = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            match normalizer.normalize(record) {
                Ok(tx) if tx.is_retainable() => transactions.push(tx),
                Ok(tx) => {
                    debug!(
                        "Dropping record {} (tx_id: {:?}, from: {:?}, to: {:?})",
                        index, tx.tx_id, tx.from_token, tx.to_token
                    );
                    summary.dropped += 1;
                }
                Err(e) => {
                    debug!("Skipping malformed record {}: {}", index, e);
                    summary.malformed += 1;
                }
            }
        }

        info!(
            "🔄 Normalized {} records: {} kept, {} dropped, {} malformed",
            summary.fetched,
            transactions.len(),
            summary.dropped,
            summary.malformed
        );

        PipelineReport {
            transactions,
            summary,
        }
    }

    /// Full run for one wallet: chain list, transfers, statistics.
    ///
    /// A partial fetch still produces statistics; the interruption is kept
    /// in the returned summary.
    pub async fn analyze_wallet(&self, wallet: &str, since: NaiveDate) -> Result<WalletAnalysis> {
        info!("🚀 Starting volume analysis for {} since {}", wallet, since);

        let chains = self.load_chains().await?;
        let report = self.run(wallet, since, &chains).await;

        if let Some(interruption) = &report.summary.interruption {
            warn!(
                "⚠️ Continuing with partial data, fetch stopped at page {}: {}",
                interruption.page, interruption.reason
            );
        }

        if report.transactions.is_empty() {
            return Err(PipelineError::NoData {
                interrupted: report.summary.is_partial(),
            });
        }

        let stats = AggregateStats::analyze(report.transactions)?;

        info!(
            "✅ Analysis complete: {} transactions ({} bridges, {} swaps), ${} total",
            stats.transaction_count(),
            stats.bridge_count,
            stats.swap_count,
            stats.grand_usd_total
        );

        Ok(WalletAnalysis {
            stats,
            summary: report.summary,
        })
    }
}
