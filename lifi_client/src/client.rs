use crate::{
    error::LifiError,
    source::{ChainListSource, TransferPageSource},
    types::{LifiClientConfig, TransferQuery, TransfersPage},
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

/// Minimum length accepted for a wallet address
const MIN_WALLET_LENGTH: usize = 10;

/// HTTP client for the LI.FI transfer analytics API and the chain list
#[derive(Debug, Clone)]
pub struct LifiClient {
    client: Client,
    config: LifiClientConfig,
}

impl LifiClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, LifiError> {
        Self::with_config(LifiClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: LifiClientConfig) -> Result<Self, LifiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn integrator(&self) -> &str {
        &self.config.integrator
    }

    pub fn config(&self) -> &LifiClientConfig {
        &self.config
    }

    /// Read the body of a successful response, mapping error statuses
    async fn read_body(response: Response, endpoint: &str) -> Result<String, LifiError> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("❌ {} error - Status: {}, Body: {}", endpoint, status, text);

            return Err(match status.as_u16() {
                429 => LifiError::RateLimit,
                _ => LifiError::ApiError {
                    message: format!("HTTP {}: {}", status, text),
                },
            });
        }

        let text = response.text().await?;
        debug!("📊 {} response size: {} bytes", endpoint, text.len());
        Ok(text)
    }
}

#[async_trait]
impl TransferPageSource for LifiClient {
    async fn fetch_transfer_page(
        &self,
        query: &TransferQuery,
        cursor: Option<&str>,
    ) -> Result<TransfersPage, LifiError> {
        let params = query.to_params(&self.config.integrator, cursor);

        debug!("🌐 GET {} wallet={} cursor={:?}", self.config.transfers_url, query.wallet, cursor);

        let start_time = std::time::Instant::now();
        let response = self
            .client
            .get(&self.config.transfers_url)
            .query(&params)
            .send()
            .await?;

        let response_text = Self::read_body(response, "Transfers API").await?;
        debug!("⏱️ Transfers request took {}ms", start_time.elapsed().as_millis());

        serde_json::from_str(&response_text).map_err(|e| {
            error!(
                "❌ Failed to parse transfers page: {} (first 500 chars: {})",
                e,
                response_text.chars().take(500).collect::<String>()
            );
            LifiError::JsonError(e)
        })
    }
}

#[async_trait]
impl ChainListSource for LifiClient {
    async fn fetch_chain_descriptors(&self) -> Result<Vec<Value>, LifiError> {
        info!("🔄 Fetching chain list from {}", self.config.chains_url);

        let response = self
            .client
            .get(&self.config.chains_url)
            .timeout(Duration::from_secs(self.config.chains_timeout_seconds))
            .send()
            .await?;

        let response_text = Self::read_body(response, "Chain list").await?;

        match serde_json::from_str::<Value>(&response_text)? {
            Value::Array(descriptors) => Ok(descriptors),
            other => Err(LifiError::MalformedPage {
                message: format!(
                    "expected a JSON array of chains, got {}",
                    json_kind(&other)
                ),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Basic wallet address check: `0x` prefix and at least 10 characters.
///
/// The pipeline itself does not validate; callers should.
pub fn validate_wallet_address(address: &str) -> Result<(), LifiError> {
    let address = address.trim();
    if !address.starts_with("0x") || address.len() < MIN_WALLET_LENGTH {
        return Err(LifiError::InvalidAddress {
            address: address.to_string(),
        });
    }
    Ok(())
}
