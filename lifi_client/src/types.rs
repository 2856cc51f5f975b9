use config_manager::SystemConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transfer status filter sent with every request
pub const TRANSFER_STATUS_ALL: &str = "ALL";

/// Default number of transfers requested per page
pub const DEFAULT_PAGE_LIMIT: u32 = 200;

/// Configuration for the LI.FI analytics client
#[derive(Debug, Clone)]
pub struct LifiClientConfig {
    pub transfers_url: String,
    pub chains_url: String,
    pub integrator: String,
    pub timeout_seconds: u64,
    pub chains_timeout_seconds: u64,
}

impl Default for LifiClientConfig {
    fn default() -> Self {
        Self::from(&SystemConfig::default())
    }
}

impl From<&SystemConfig> for LifiClientConfig {
    fn from(config: &SystemConfig) -> Self {
        Self {
            transfers_url: config.lifi.transfers_url.clone(),
            chains_url: config.chains.chains_url.clone(),
            integrator: config.lifi.integrator.clone(),
            timeout_seconds: config.lifi.request_timeout_seconds,
            chains_timeout_seconds: config.chains.request_timeout_seconds,
        }
    }
}

/// Wallet and time window for a transfer history request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferQuery {
    pub wallet: String,
    pub from_timestamp: i64,
    pub to_timestamp: i64,
    pub limit: u32,
}

impl TransferQuery {
    pub fn new(wallet: &str, from_timestamp: i64, to_timestamp: i64, limit: u32) -> Self {
        Self {
            wallet: wallet.to_string(),
            from_timestamp,
            to_timestamp,
            limit,
        }
    }

    /// Query string for one page; `cursor` is the `next` token of the previous page
    pub fn to_params(&self, integrator: &str, cursor: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("wallet", self.wallet.clone()),
            ("fromTimestamp", self.from_timestamp.to_string()),
            ("toTimestamp", self.to_timestamp.to_string()),
            ("status", TRANSFER_STATUS_ALL.to_string()),
            ("integrator", integrator.to_string()),
            ("limit", self.limit.to_string()),
        ];

        if let Some(next) = cursor {
            params.push(("next", next.to_string()));
        }

        params
    }
}

/// One page of the transfers endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransfersPage {
    #[serde(default)]
    pub data: Vec<RawTransferRecord>,

    #[serde(rename = "hasNext", default)]
    pub has_next: Option<bool>,

    #[serde(default)]
    pub next: Option<String>,
}

impl TransfersPage {
    pub fn has_more(&self) -> bool {
        self.has_next.unwrap_or(false)
    }

    /// Cursor for the following page, ignoring empty tokens
    pub fn cursor(&self) -> Option<&str> {
        self.next.as_deref().filter(|c| !c.is_empty())
    }
}

/// A transfer exactly as the API returned it.
///
/// The payload is kept untyped: legs, tokens and scalars are all optional
/// and their JSON types vary between integrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTransferRecord(pub Value);

impl RawTransferRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn sending(&self) -> RawLeg<'_> {
        RawLeg::from_value(self.0.get("sending"))
    }

    pub fn receiving(&self) -> RawLeg<'_> {
        RawLeg::from_value(self.0.get("receiving"))
    }

    /// Bridge or exchange used for the transfer
    pub fn tool(&self) -> Option<&str> {
        self.0
            .get("tool")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }

    /// Ordering key: the sending leg's timestamp, 0 when absent or not an integer
    pub fn sort_timestamp(&self) -> i64 {
        self.sending()
            .timestamp()
            .and_then(value_as_i64)
            .unwrap_or(0)
    }
}

/// Read-only view of the `sending` or `receiving` side of a transfer
#[derive(Debug, Clone, Copy)]
pub struct RawLeg<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> RawLeg<'a> {
    fn from_value(value: Option<&'a Value>) -> Self {
        Self {
            fields: value.and_then(Value::as_object),
        }
    }

    pub fn is_present(&self) -> bool {
        self.fields.is_some()
    }

    /// Field value, treating JSON `null` as absent
    fn field(&self, key: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|f| f.get(key))
            .filter(|v| !v.is_null())
    }

    pub fn tx_hash(&self) -> Option<&'a str> {
        self.field("txHash")
            .and_then(Value::as_str)
            .filter(|h| !h.is_empty())
    }

    pub fn timestamp(&self) -> Option<&'a Value> {
        self.field("timestamp")
    }

    pub fn chain_id(&self) -> Option<&'a Value> {
        self.field("chainId")
    }

    pub fn amount(&self) -> Option<&'a Value> {
        self.field("amount")
    }

    pub fn token(&self) -> RawToken<'a> {
        RawToken {
            fields: self.field("token").and_then(Value::as_object),
        }
    }
}

/// Token descriptor of a leg
#[derive(Debug, Clone, Copy)]
pub struct RawToken<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> RawToken<'a> {
    fn field(&self, key: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|f| f.get(key))
            .filter(|v| !v.is_null())
    }

    pub fn symbol(&self) -> Option<&'a str> {
        self.field("symbol").and_then(Value::as_str)
    }

    pub fn decimals(&self) -> Option<&'a Value> {
        self.field("decimals")
    }

    pub fn price_usd(&self) -> Option<&'a Value> {
        self.field("priceUSD")
    }
}

/// Integer coercion used for ids and timestamps: JSON integers, whole
/// floats (truncated) and numeric strings.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
