use crate::{
    chain_directory::ChainDirectory,
    error::LifiError,
    types::{value_as_i64, RawLeg, RawTransferRecord},
};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;
use volume_core::{
    parse_raw_amount, round_display_amount, scale_raw_amount, shorten_tx_hash,
    zero_display_amount, CanonicalTransaction,
};

/// Converts raw API transfers into [`CanonicalTransaction`]s.
///
/// Missing or unparseable amounts, decimals and prices never fail a
/// record; they fall back to `0.0000` and no USD contribution. Only a
/// record that is not a JSON object, or whose timestamp is not an integer,
/// is rejected.
#[derive(Debug, Clone, Copy)]
pub struct RecordNormalizer<'a> {
    chains: &'a ChainDirectory,
}

/// One side of a transfer after extraction
#[derive(Debug, Clone, PartialEq)]
struct NormalizedLeg {
    symbol: String,
    chain: String,
    /// Four fractional digits
    amount: Decimal,
    /// Full-precision amount times unit price
    usd: Option<Decimal>,
}

impl<'a> RecordNormalizer<'a> {
    pub fn new(chains: &'a ChainDirectory) -> Self {
        Self { chains }
    }

    pub fn normalize(&self, raw: &RawTransferRecord) -> Result<CanonicalTransaction, LifiError> {
        if !raw.is_object() {
            return Err(LifiError::MalformedRecord {
                message: format!("expected a transfer object, got {}", raw.as_value()),
            });
        }

        let sending = raw.sending();
        let receiving = raw.receiving();

        let timestamp = transfer_timestamp(&sending, &receiving)?;
        let tx_hash = sending.tx_hash().or_else(|| receiving.tx_hash());

        let from = self.normalize_leg(&sending);
        let to = self.normalize_leg(&receiving);

        // Sending leg wins; receiving leg only when sending gives nothing
        let usd_value = non_zero(from.usd)
            .or_else(|| non_zero(to.usd))
            .unwrap_or(Decimal::ZERO)
            .normalize();

        let tx = CanonicalTransaction {
            tx_id: tx_hash.map(shorten_tx_hash).unwrap_or_default(),
            timestamp,
            from_token: from.symbol,
            from_chain: from.chain,
            from_amount: from.amount,
            to_token: to.symbol,
            to_chain: to.chain,
            to_amount: to.amount,
            usd_value,
            platform: raw.tool().unwrap_or_default().to_string(),
        };

        debug!(
            "Normalized {} {} {} -> {} {} (${})",
            tx.tx_id, tx.from_amount, tx.from_token, tx.to_amount, tx.to_token, tx.usd_value
        );

        Ok(tx)
    }

    fn normalize_leg(&self, leg: &RawLeg<'_>) -> NormalizedLeg {
        let token = leg.token();
        let amount = leg_amount(leg);
        let price = token.price_usd().map_or(Some(Decimal::ZERO), parse_price);

        let usd = match (amount, price) {
            (Some(amount), Some(price)) => amount.checked_mul(price),
            _ => None,
        };

        NormalizedLeg {
            symbol: token.symbol().unwrap_or_default().to_string(),
            chain: self.chains.resolve(leg.chain_id()),
            amount: amount.map(round_display_amount).unwrap_or_else(zero_display_amount),
            usd,
        }
    }
}

/// Sending timestamp, else receiving, else 0. Zero and empty values count as absent.
fn transfer_timestamp(sending: &RawLeg<'_>, receiving: &RawLeg<'_>) -> Result<i64, LifiError> {
    let Some(raw) = [sending.timestamp(), receiving.timestamp()]
        .into_iter()
        .flatten()
        .find(|v| is_set(v))
    else {
        return Ok(0);
    };

    value_as_i64(raw).ok_or_else(|| LifiError::MalformedRecord {
        message: format!("timestamp is not an integer: {}", raw),
    })
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Full-precision human amount, if both the raw amount and decimals are usable
fn leg_amount(leg: &RawLeg<'_>) -> Option<Decimal> {
    let decimals = leg
        .token()
        .decimals()
        .and_then(Value::as_u64)
        .and_then(|d| u32::try_from(d).ok())?;

    match leg.amount()? {
        Value::String(s) => parse_raw_amount(s, decimals),
        Value::Number(n) => {
            if let Some(units) = n.as_i64() {
                scale_raw_amount(i128::from(units), decimals)
            } else if let Some(units) = n.as_u64() {
                scale_raw_amount(i128::from(units), decimals)
            } else {
                let units = n.as_f64().filter(|f| f.is_finite())?;
                scale_raw_amount(units.trunc() as i128, decimals)
            }
        }
        _ => None,
    }
}

/// Unit price in USD. An empty price is 0; an unparseable one is `None`.
fn parse_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(Decimal::ZERO);
            }
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(Decimal::from_f64))
        }
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64),
        _ => None,
    }
}

fn non_zero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}
