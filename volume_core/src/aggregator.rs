use crate::{AnalysisError, CanonicalTransaction, Result, TransferKind};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Label used in platform counts when a transfer has no tool name
pub const UNKNOWN_PLATFORM: &str = "Unknown Platform";

/// Summary statistics over a wallet's transfers.
///
/// Only ever built from a complete, non-empty transaction list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateStats {
    /// Most recent first, as produced by the pipeline
    pub transactions: Vec<CanonicalTransaction>,
    pub platform_counts: HashMap<String, usize>,
    pub chains_used: BTreeSet<String>,
    pub bridge_count: usize,
    pub swap_count: usize,
    pub bridge_usd_total: Decimal,
    pub swap_usd_total: Decimal,
    pub grand_usd_total: Decimal,
}

/// One row of the per-platform breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformShare {
    pub platform: String,
    pub count: usize,
    /// Percentage of the transaction count, 0-100
    pub percentage: Decimal,
}

impl AggregateStats {
    /// Classify and total every transaction in a single pass.
    pub fn analyze(transactions: Vec<CanonicalTransaction>) -> Result<Self> {
        if transactions.is_empty() {
            warn!("❌ No transactions to analyze");
            return Err(AnalysisError::Empty);
        }

        let mut stats = Self::default();
        for tx in &transactions {
            stats.record(tx);
        }
        stats.transactions = transactions;

        info!(
            "📊 Analyzed {} transactions: {} bridges, {} swaps, {} chains, total ${}",
            stats.transaction_count(),
            stats.bridge_count,
            stats.swap_count,
            stats.chains_used.len(),
            stats.grand_usd_total
        );

        Ok(stats)
    }

    fn record(&mut self, tx: &CanonicalTransaction) {
        self.chains_used.insert(tx.from_chain.clone());
        self.chains_used.insert(tx.to_chain.clone());

        let platform = if tx.platform.is_empty() {
            UNKNOWN_PLATFORM
        } else {
            tx.platform.as_str()
        };
        *self.platform_counts.entry(platform.to_string()).or_insert(0) += 1;

        match tx.kind() {
            TransferKind::Swap => {
                self.swap_count += 1;
                self.swap_usd_total = add_usd(self.swap_usd_total, tx.usd_value, "swap");
            }
            TransferKind::Bridge => {
                self.bridge_count += 1;
                self.bridge_usd_total = add_usd(self.bridge_usd_total, tx.usd_value, "bridge");
            }
        }

        self.grand_usd_total = add_usd(self.grand_usd_total, tx.usd_value, "grand");

        debug!(
            "{} {} {} -> {} {} via {} (${})",
            tx.kind().as_str(),
            tx.from_token,
            tx.from_chain,
            tx.to_token,
            tx.to_chain,
            platform,
            tx.usd_value
        );
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Bridge volume as a percentage of the grand total (0 when the total is 0)
    pub fn bridge_share_pct(&self) -> Decimal {
        self.share_of_total(self.bridge_usd_total)
    }

    /// Swap volume as a percentage of the grand total (0 when the total is 0)
    pub fn swap_share_pct(&self) -> Decimal {
        self.share_of_total(self.swap_usd_total)
    }

    fn share_of_total(&self, part: Decimal) -> Decimal {
        if self.grand_usd_total.is_zero() {
            return Decimal::ZERO;
        }
        part.checked_div(self.grand_usd_total)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }

    /// Platforms ordered by count descending, ties by name
    pub fn platform_breakdown(&self) -> Vec<PlatformShare> {
        let total = Decimal::from(self.transaction_count());

        let mut shares: Vec<PlatformShare> = self
            .platform_counts
            .iter()
            .map(|(platform, &count)| PlatformShare {
                platform: platform.clone(),
                count,
                percentage: if total.is_zero() {
                    Decimal::ZERO
                } else {
                    Decimal::from(count) * Decimal::ONE_HUNDRED / total
                },
            })
            .collect();

        shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.platform.cmp(&b.platform)));
        shares
    }

    /// Chain display names in lexicographic order
    pub fn chains_sorted(&self) -> Vec<&str> {
        self.chains_used.iter().map(String::as_str).collect()
    }
}

/// Running-total addition that clamps at `Decimal::MAX`/`MIN` instead of panicking
fn add_usd(total: Decimal, value: Decimal, label: &str) -> Decimal {
    total.checked_add(value).unwrap_or_else(|| {
        warn!(
            "⚠️ {} USD total overflowed adding ${}, clamping",
            label, value
        );
        total.saturating_add(value)
    })
}
