use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Metadata rows fetched per page while scanning. Default: 500.
    pub page_size: u64,
}

/// Aggregator job configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AggregatorConfig {
    pub database: DatabaseConfig,
    pub scan: ScanConfig,
}

impl AggregatorConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONTENT_HUB_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("scan.page_size", 500_i64)?
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("CONTENT_HUB").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
