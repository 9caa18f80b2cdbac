use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. `"*"` allows any origin; empty disables cross-origin access.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// Blob storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded images. Default: "./media".
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
    /// Public URL prefix for stored blobs. Default: "/media/".
    #[serde(default = "default_media_url")]
    pub media_url: String,
    /// Maximum accepted upload size in bytes. Default: 64 MiB.
    #[serde(default = "default_max_blob_size")]
    pub max_blob_size: u64,
}

fn default_media_root() -> PathBuf {
    PathBuf::from("./media")
}
fn default_media_url() -> String {
    "/media/".into()
}
fn default_max_blob_size() -> u64 {
    64 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_root: default_media_root(),
            media_url: default_media_url(),
            max_blob_size: default_max_blob_size(),
        }
    }
}

impl StorageConfig {
    /// Public URL for a stored blob key.
    pub fn url_for(&self, key: &str) -> String {
        if self.media_url.ends_with('/') {
            format!("{}{key}", self.media_url)
        } else {
            format!("{}/{key}", self.media_url)
        }
    }
}

/// Upload and listing behaviour.
#[derive(Debug, Deserialize, Clone)]
pub struct GalleryConfig {
    /// Device identifier recorded when `X-Device-Id` is absent. Default: "esp32cam".
    #[serde(default = "default_device_id")]
    pub default_device_id: String,
    /// Number of photos returned when the listing has no paging parameters. Default: 20.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u64,
    /// Page size used when `limit` is omitted or unparsable. Default: 20.
    #[serde(default = "default_page_limit")]
    pub default_page_limit: u64,
    /// Optional upper bound applied to a requested `limit`. Default: unbounded.
    #[serde(default)]
    pub max_page_limit: Option<u64>,
}

fn default_device_id() -> String {
    "esp32cam".into()
}
fn default_recent_limit() -> u64 {
    20
}
fn default_page_limit() -> u64 {
    20
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            default_device_id: default_device_id(),
            recent_limit: default_recent_limit(),
            default_page_limit: default_page_limit(),
            max_page_limit: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("GALLERY_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite://gallery.db?mode=rwc")?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., GALLERY__DATABASE__URL)
            .add_source(Environment::with_prefix("GALLERY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
