use crate::{
    source::TransferPageSource,
    types::{RawTransferRecord, TransferQuery},
};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Pause between consecutive page requests
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

/// Why pagination stopped before the last page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchInterruption {
    /// 1-based number of the page that failed
    pub page: u32,
    pub reason: String,
}

/// Everything collected by one paginated fetch
#[derive(Debug, Clone, Default)]
pub struct FetchedTransfers {
    /// Records in request order
    pub records: Vec<RawTransferRecord>,
    /// Pages successfully received
    pub pages_fetched: u32,
    /// Set when a request failed and the records are partial
    pub interruption: Option<FetchInterruption>,
}

impl FetchedTransfers {
    pub fn is_complete(&self) -> bool {
        self.interruption.is_none()
    }
}

/// Follows the transfers cursor until the API reports no further pages.
///
/// Best effort: the first failed request ends pagination and whatever was
/// already received is returned. Nothing is retried.
pub struct TransferFetcher<'a, S: TransferPageSource + ?Sized> {
    source: &'a S,
    page_delay: Duration,
}

impl<'a, S: TransferPageSource + ?Sized> TransferFetcher<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub async fn fetch_all(
        &self,
        wallet: &str,
        from_timestamp: i64,
        to_timestamp: i64,
        page_limit: u32,
    ) -> FetchedTransfers {
        let query = TransferQuery::new(wallet, from_timestamp, to_timestamp, page_limit);
        let start_time = std::time::Instant::now();
        let mut fetched = FetchedTransfers::default();
        let mut cursor: Option<String> = None;

        info!(
            "🔥 Fetching transfers for wallet {} ({} → {}, limit {})",
            wallet, from_timestamp, to_timestamp, page_limit
        );

        loop {
            let page_num = fetched.pages_fetched + 1;
            let page_start = std::time::Instant::now();

            let page = match self
                .source
                .fetch_transfer_page(&query, cursor.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "❌ Page {} failed, keeping {} records already fetched: {}",
                        page_num,
                        fetched.records.len(),
                        e
                    );
                    fetched.interruption = Some(FetchInterruption {
                        page: page_num,
                        reason: e.to_string(),
                    });
                    break;
                }
            };

            let has_more = page.has_more();
            let next_cursor = page.cursor().map(str::to_string);

            info!(
                "📄 Page {}: {} transfers in {}ms, has_next: {}",
                page_num,
                page.data.len(),
                page_start.elapsed().as_millis(),
                has_more
            );

            fetched.records.extend(page.data);
            fetched.pages_fetched = page_num;

            if !has_more {
                break;
            }

            // Re-requesting without a cursor would restart from page one
            let Some(next) = next_cursor else {
                warn!("⚠️ Page {} reported more data but no cursor; stopping", page_num);
                fetched.interruption = Some(FetchInterruption {
                    page: page_num + 1,
                    reason: "hasNext set without a next cursor".to_string(),
                });
                break;
            };

            debug!("🔗 Next cursor available for page {}", page_num + 1);
            cursor = Some(next);

            if !self.page_delay.is_zero() {
                sleep(self.page_delay).await;
            }
        }

        info!(
            "📊 Pagination Summary: {} pages, {} transfers in {}ms{}",
            fetched.pages_fetched,
            fetched.records.len(),
            start_time.elapsed().as_millis(),
            if fetched.is_complete() { "" } else { " (partial)" }
        );

        fetched
    }
}
