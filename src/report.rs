use chrono::{DateTime, NaiveDate, Utc};
use job_orchestrator::{FetchSummary, WalletAnalysis};
use std::path::{Path, PathBuf};
use volume_core::{format_usd, format_usd_total, time::relative_age, AggregateStats};

const RULE: &str = "============================================================";

/// Transactions listed under "recent activity"
const RECENT_LIMIT: usize = 5;

/// Plain-text report of a wallet analysis, as printed by the binary
pub fn render_report(analysis: &WalletAnalysis, now: DateTime<Utc>) -> String {
    let stats = &analysis.stats;
    let mut lines = vec![
        String::new(),
        RULE.to_string(),
        "📊 JUMPER TRANSFER VOLUME".to_string(),
        RULE.to_string(),
    ];

    lines.extend(general_section(stats));
    lines.extend(usd_section(stats));
    lines.extend(chain_section(stats));
    lines.extend(platform_section(stats));
    lines.extend(recent_section(stats, now));
    lines.extend(fetch_section(&analysis.summary));

    lines.push(RULE.to_string());
    lines.join("\n")
}

fn general_section(stats: &AggregateStats) -> Vec<String> {
    vec![
        String::new(),
        "📈 OVERVIEW".to_string(),
        format!("   • Total transactions : {}", stats.transaction_count()),
        format!("   • Bridges : {}", stats.bridge_count),
        format!("   • Swaps : {}", stats.swap_count),
        format!("   • Chains used : {}", stats.chains_used.len()),
    ]
}

fn usd_section(stats: &AggregateStats) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "💰 USD VOLUME".to_string(),
        format!("   • Total : {}", format_usd_total(stats.grand_usd_total)),
        format!("   • Bridges : {}", format_usd_total(stats.bridge_usd_total)),
        format!("   • Swaps : {}", format_usd_total(stats.swap_usd_total)),
    ];

    // Shares are meaningless without any priced volume
    if stats.grand_usd_total > rust_decimal::Decimal::ZERO {
        lines.push(format!(
            "   • % Bridges : {:.1}%",
            stats.bridge_share_pct().round_dp(1)
        ));
        lines.push(format!(
            "   • % Swaps : {:.1}%",
            stats.swap_share_pct().round_dp(1)
        ));
    }

    lines
}

fn chain_section(stats: &AggregateStats) -> Vec<String> {
    let chains = stats.chains_sorted();
    let mut lines = vec![String::new(), format!("🔗 CHAINS ({})", chains.len())];
    lines.extend(
        chains
            .iter()
            .enumerate()
            .map(|(i, chain)| format!("   {}. {}", i + 1, chain)),
    );
    lines
}

fn platform_section(stats: &AggregateStats) -> Vec<String> {
    let mut lines = vec![String::new(), "🪐 PLATFORMS".to_string()];
    lines.extend(stats.platform_breakdown().into_iter().map(|share| {
        format!(
            "   • {} : {} transaction(s) ({:.1}%)",
            share.platform,
            share.count,
            share.percentage.round_dp(1)
        )
    }));
    lines
}

fn recent_section(stats: &AggregateStats, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![String::new(), "🕒 RECENT ACTIVITY".to_string()];
    lines.extend(stats.transactions.iter().take(RECENT_LIMIT).map(|tx| {
        format!(
            "   • [{}] {} {} {} ({}) → {} {} ({}) | {} | {} | {}",
            tx.kind().as_str(),
            tx.tx_id,
            tx.from_amount,
            tx.from_token,
            tx.from_chain,
            tx.to_amount,
            tx.to_token,
            tx.to_chain,
            format_usd(Some(tx.usd_value)),
            if tx.platform.is_empty() { "-" } else { tx.platform.as_str() },
            relative_age(tx.timestamp, now)
        )
    }));
    lines
}

fn fetch_section(summary: &FetchSummary) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "📡 FETCH".to_string(),
        format!("   • Pages fetched : {}", summary.pages_fetched),
        format!("   • Records received : {}", summary.fetched),
        format!(
            "   • Records skipped : {} incomplete, {} malformed",
            summary.dropped, summary.malformed
        ),
    ];

    if let Some(interruption) = &summary.interruption {
        lines.push(format!(
            "   ⚠️ Partial data: page {} failed ({})",
            interruption.page, interruption.reason
        ));
    }

    lines
}

/// `<output_dir>/jumper_<first 8 chars of wallet>_<since>.csv`
pub fn default_export_path(output_dir: &str, wallet: &str, since: NaiveDate) -> PathBuf {
    let prefix: String = wallet.chars().take(8).collect();
    Path::new(output_dir).join(format!("jumper_{}_{}.csv", prefix, since.format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lifi_client::FetchInterruption;
    use rust_decimal_macros::dec;
    use volume_core::CanonicalTransaction;

    fn tx(
        id: &str,
        from_chain: &str,
        to_chain: &str,
        usd: rust_decimal::Decimal,
        platform: &str,
    ) -> CanonicalTransaction {
        CanonicalTransaction {
            tx_id: id.to_string(),
            timestamp: 1_704_189_600,
            from_token: "USDC".to_string(),
            from_chain: from_chain.to_string(),
            from_amount: dec!(1.5000),
            to_token: "USDC".to_string(),
            to_chain: to_chain.to_string(),
            to_amount: dec!(1.4990),
            usd_value: usd,
            platform: platform.to_string(),
        }
    }

    fn analysis(transactions: Vec<CanonicalTransaction>, summary: FetchSummary) -> WalletAnalysis {
        WalletAnalysis {
            stats: AggregateStats::analyze(transactions).unwrap(),
            summary,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 13, 5, 0).unwrap()
    }

    #[test]
    fn test_report_sections() {
        let analysis = analysis(
            vec![
                tx("0xaaaa...0001", "Ethereum Mainnet", "Polygon Mainnet", dec!(3), "stargate"),
                tx("0xaaaa...0002", "Ethereum Mainnet", "Ethereum Mainnet", dec!(1), "stargate"),
                tx("0xaaaa...0003", "Base", "Ethereum Mainnet", dec!(0), ""),
            ],
            FetchSummary {
                pages_fetched: 1,
                fetched: 4,
                dropped: 1,
                ..FetchSummary::default()
            },
        );

        let report = render_report(&analysis, now());

        assert!(report.contains("   • Total transactions : 3"));
        assert!(report.contains("   • Bridges : 2"));
        assert!(report.contains("   • Total : $4.00"));
        assert!(report.contains("   • Swaps : $1.00"));
        assert!(report.contains(" | $3.0000 | stargate | "));
        assert!(report.contains("   • % Bridges : 75.0%"));
        assert!(report.contains("   • % Swaps : 25.0%"));
        assert!(report.contains("🔗 CHAINS (3)"));
        assert!(report.contains("   1. Base\n   2. Ethereum Mainnet\n   3. Polygon Mainnet"));
        assert!(report.contains("   • stargate : 2 transaction(s) (66.7%)"));
        assert!(report.contains("   • Unknown Platform : 1 transaction(s) (33.3%)"));
        assert!(report.contains("3 hours, 5 minutes ago • 02 Jan 2024 (10:00 UTC)"));
        assert!(report.contains("   • Records skipped : 1 incomplete, 0 malformed"));
        assert!(!report.contains("Partial data"));
    }

    #[test]
    fn test_shares_hidden_without_usd_volume() {
        let analysis = analysis(
            vec![tx("0xaaaa...0001", "Base", "Base", dec!(0), "relay")],
            FetchSummary::default(),
        );

        let report = render_report(&analysis, now());
        assert!(report.contains("   • Total : $0.00"));
        assert!(!report.contains("% Bridges"));
    }

    #[test]
    fn test_partial_fetch_is_flagged() {
        let analysis = analysis(
            vec![tx("0xaaaa...0001", "Base", "Base", dec!(2), "relay")],
            FetchSummary {
                pages_fetched: 2,
                fetched: 400,
                interruption: Some(FetchInterruption {
                    page: 3,
                    reason: "HTTP 502".to_string(),
                }),
                ..FetchSummary::default()
            },
        );

        let report = render_report(&analysis, now());
        assert!(report.contains("⚠️ Partial data: page 3 failed (HTTP 502)"));
    }

    #[test]
    fn test_default_export_path() {
        let since = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let path = default_export_path("exports", "0x742d35cc6131b2f6e7f4", since);
        assert_eq!(path, Path::new("exports").join("jumper_0x742d35_2024-03-01.csv"));
    }
}
