use crate::{error::LifiError, source::ChainListSource, types::value_as_i64};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Display name used when a leg carries no chain id at all
pub const UNKNOWN_CHAIN: &str = "Unknown Chain";

/// Numeric chain id to human-readable chain name. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainDirectory {
    names: HashMap<u64, String>,
}

impl ChainDirectory {
    /// Build from raw descriptors, skipping any without a usable id or name.
    ///
    /// The id is read from `chainId`, falling back to `id`. Id 0 is treated
    /// as missing.
    pub fn from_descriptors(descriptors: &[Value]) -> Self {
        let mut names = HashMap::new();
        let mut skipped = 0usize;

        for descriptor in descriptors {
            match parse_descriptor(descriptor) {
                Some((id, name)) => {
                    names.insert(id, name);
                }
                None => {
                    skipped += 1;
                    debug!("Skipping chain descriptor without id or name: {}", descriptor);
                }
            }
        }

        if skipped > 0 {
            debug!("Skipped {} unusable chain descriptors", skipped);
        }

        Self { names }
    }

    /// Fetch and build the directory.
    ///
    /// A failed request, or a response with no usable entries, is
    /// `MetadataUnavailable`: chain names cannot be resolved without it.
    pub async fn load<S>(source: &S) -> Result<Self, LifiError>
    where
        S: ChainListSource + ?Sized,
    {
        let descriptors = source.fetch_chain_descriptors().await.map_err(|e| {
            warn!("❌ Failed to fetch chain list: {}", e);
            LifiError::MetadataUnavailable {
                reason: e.to_string(),
            }
        })?;

        let directory = Self::from_descriptors(&descriptors);
        if directory.is_empty() {
            warn!(
                "❌ Chain list contained no usable entries ({} descriptors)",
                descriptors.len()
            );
            return Err(LifiError::MetadataUnavailable {
                reason: format!(
                    "no usable chain descriptors among {} received",
                    descriptors.len()
                ),
            });
        }

        info!("✅ {} chains loaded", directory.len());
        Ok(directory)
    }

    pub fn name(&self, chain_id: u64) -> Option<&str> {
        self.names.get(&chain_id).map(String::as_str)
    }

    /// Display name for a leg's raw `chainId` value.
    ///
    /// Unknown ids render as `Chain <id>`; a missing id as [`UNKNOWN_CHAIN`].
    pub fn resolve(&self, chain_id: Option<&Value>) -> String {
        let Some(raw) = chain_id else {
            return UNKNOWN_CHAIN.to_string();
        };

        let known = value_as_i64(raw)
            .and_then(|id| u64::try_from(id).ok())
            .and_then(|id| self.name(id));

        match (known, raw) {
            (Some(name), _) => name.to_string(),
            (None, Value::String(s)) => format!("Chain {}", s),
            (None, other) => format!("Chain {}", other),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(u64, String)> for ChainDirectory {
    fn from_iter<I: IntoIterator<Item = (u64, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

fn parse_descriptor(descriptor: &Value) -> Option<(u64, String)> {
    let id_value = descriptor
        .get("chainId")
        .filter(|v| !v.is_null())
        .or_else(|| descriptor.get("id"))?;

    let id = value_as_i64(id_value).and_then(|id| u64::try_from(id).ok())?;
    if id == 0 {
        return None;
    }

    let name = descriptor
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())?;

    Some((id, name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticChains(Result<Vec<Value>, String>);

    #[async_trait]
    impl ChainListSource for StaticChains {
        async fn fetch_chain_descriptors(&self) -> Result<Vec<Value>, LifiError> {
            self.0.clone().map_err(|message| LifiError::ApiError { message })
        }
    }

    #[test]
    fn test_malformed_descriptor_does_not_abort() {
        let directory = ChainDirectory::from_descriptors(&[
            json!({"chainId": 1, "name": "Ethereum Mainnet"}),
            json!({"name": "Foo"}),
            json!({"chainId": "not-a-number", "name": "Bar"}),
            json!({"chainId": 10, "name": ""}),
            json!("garbage"),
            json!({"chainId": 137, "name": "Polygon Mainnet"}),
        ]);

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.name(1), Some("Ethereum Mainnet"));
        assert_eq!(directory.name(137), Some("Polygon Mainnet"));
    }

    #[test]
    fn test_id_coercion_and_fallback_field() {
        let directory = ChainDirectory::from_descriptors(&[
            json!({"chainId": "42161", "name": "Arbitrum One"}),
            json!({"id": 8453, "name": "Base"}),
            json!({"chainId": null, "id": 10, "name": "OP Mainnet"}),
            json!({"chainId": 0, "name": "Zero"}),
        ]);

        assert_eq!(directory.name(42161), Some("Arbitrum One"));
        assert_eq!(directory.name(8453), Some("Base"));
        assert_eq!(directory.name(10), Some("OP Mainnet"));
        assert_eq!(directory.name(0), None);
    }

    #[test]
    fn test_resolve() {
        let directory: ChainDirectory = [(1, "Ethereum Mainnet".to_string())].into_iter().collect();

        assert_eq!(directory.resolve(Some(&json!(1))), "Ethereum Mainnet");
        assert_eq!(directory.resolve(Some(&json!("1"))), "Ethereum Mainnet");
        assert_eq!(directory.resolve(Some(&json!(999))), "Chain 999");
        assert_eq!(directory.resolve(Some(&json!("sol"))), "Chain sol");
        assert_eq!(directory.resolve(None), UNKNOWN_CHAIN);
    }

    #[tokio::test]
    async fn test_load_success() {
        let source = StaticChains(Ok(vec![
            json!({"chainId": 1, "name": "Ethereum Mainnet"}),
            json!({"name": "Foo"}),
        ]));
        let directory = ChainDirectory::load(&source).await.unwrap();
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_is_metadata_unavailable() {
        let source = StaticChains(Err("HTTP 503".to_string()));
        let result = ChainDirectory::load(&source).await;
        assert!(matches!(result, Err(LifiError::MetadataUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_load_with_no_usable_entries_is_metadata_unavailable() {
        let source = StaticChains(Ok(vec![json!({"name": "Foo"})]));
        let result = ChainDirectory::load(&source).await;
        assert!(matches!(result, Err(LifiError::MetadataUnavailable { .. })));
    }
}
