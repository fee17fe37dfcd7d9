use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory containing the pre-built client application.
    pub static_dir: PathBuf,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Session token lifetime. Default: 24.
    pub token_ttl_hours: i64,
    /// OAuth client ID that Google ID tokens must be issued for.
    pub google_client_id: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    S3,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct S3Config {
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    #[serde(default)]
    pub path_style: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    /// Base of public object URLs: `{public_url_base}/{bucket}/{key}`.
    pub public_url_base: String,
    /// Root directory for the filesystem backend.
    pub root: PathBuf,
    #[serde(default)]
    pub s3: S3Config,
}

impl StorageConfig {
    /// Prefix every public URL of this bucket starts with, including the trailing `/`.
    pub fn public_prefix(&self) -> String {
        format!(
            "{}/{}/",
            self.public_url_base.trim_end_matches('/'),
            self.bucket
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Maximum request body size for uploads, in bytes.
    pub max_body_bytes: usize,
    /// How many `name(n).ext` candidates to try before giving up.
    pub max_name_probes: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub frequent_keywords_limit: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONTENT_HUB_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.static_dir", "../frontend/build")?
            .set_default("server.cors.allow_origins", vec!["http://localhost:3000"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("auth.google_client_id", "")?
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.public_url_base", "https://storage.googleapis.com")?
            .set_default("storage.root", "./data/objects")?
            .set_default("storage.s3.region", "auto")?
            .set_default("upload.max_body_bytes", 256 * 1024 * 1024)?
            .set_default("upload.max_name_probes", 1000)?
            .set_default("search.frequent_keywords_limit", 12)?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., CONTENT_HUB__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("CONTENT_HUB")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
