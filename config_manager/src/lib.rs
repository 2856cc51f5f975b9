use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Largest page size the transfers endpoint accepts
pub const MAX_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// General system settings
    pub system: SystemSettings,

    /// LI.FI transfer analytics API
    pub lifi: LifiConfig,

    /// Chain metadata source
    pub chains: ChainListConfig,

    /// CSV export settings
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Enable debug logging for every crate
    pub debug_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifiConfig {
    /// Transfers endpoint
    pub transfers_url: String,

    /// Integrator identifier sent with every request
    pub integrator: String,

    /// Records requested per page
    pub page_limit: u32,

    /// Fixed pause between page requests in milliseconds
    pub page_delay_ms: u64,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainListConfig {
    /// JSON array of chain descriptors (`chainId`, `name`)
    pub chains_url: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for CSV files when no explicit path is given
    pub output_dir: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            system: SystemSettings { debug_mode: false },
            lifi: LifiConfig {
                transfers_url: "https://li.quest/v2/analytics/transfers".to_string(),
                integrator: "jumper.exchange".to_string(),
                page_limit: 200,
                page_delay_ms: 100,
                request_timeout_seconds: 30,
            },
            chains: ChainListConfig {
                chains_url: "https://chainid.network/chains.json".to_string(),
                request_timeout_seconds: 30,
            },
            export: ExportConfig {
                output_dir: ".".to_string(),
            },
        }
    }
}

impl LifiConfig {
    /// Validate LI.FI configuration
    pub fn validate(&self) -> Result<()> {
        if self.transfers_url.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "LI.FI transfers URL is required".to_string(),
            ));
        }

        if self.integrator.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "Integrator identifier is required".to_string(),
            ));
        }

        if self.page_limit == 0 || self.page_limit > MAX_PAGE_LIMIT {
            return Err(ConfigurationError::InvalidValue(format!(
                "Page limit must be between 1 and {}, got {}",
                MAX_PAGE_LIMIT, self.page_limit
            )));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl ChainListConfig {
    /// Validate chain list configuration
    pub fn validate(&self) -> Result<()> {
        if self.chains_url.trim().is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "Chain list URL is required".to_string(),
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl SystemConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config_builder = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&SystemConfig::default())?);

        if config_path.as_ref().exists() {
            info!(
                "Loading configuration from: {}",
                config_path.as_ref().display()
            );
            config_builder = config_builder.add_source(File::from(config_path.as_ref()));
        } else {
            debug!("Config file not found, using defaults and environment variables");
        }

        // JUMPER__LIFI__PAGE_LIMIT=100 etc.
        config_builder = config_builder.add_source(
            Environment::with_prefix("JUMPER")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        );

        let system_config: SystemConfig = config_builder.build()?.try_deserialize()?;
        system_config.validate()?;

        Ok(system_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.lifi.validate()?;
        self.chains.validate()?;
        Ok(())
    }

    /// Get configuration as a JSON value
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
