use crate::{
    error::LifiError,
    types::{TransferQuery, TransfersPage},
};
use async_trait::async_trait;
use serde_json::Value;

/// Provider of raw chain descriptors (`chainId`/`id` and `name`)
#[async_trait]
pub trait ChainListSource: Send + Sync {
    async fn fetch_chain_descriptors(&self) -> Result<Vec<Value>, LifiError>;
}

/// Provider of cursor-paginated transfer history
#[async_trait]
pub trait TransferPageSource: Send + Sync {
    /// Fetch one page; `cursor` is `None` for the first request
    async fn fetch_transfer_page(
        &self,
        query: &TransferQuery,
        cursor: Option<&str>,
    ) -> Result<TransfersPage, LifiError>;
}
