use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Origin allowed by CORS when neither config nor `FRONT_URL` set one.
pub const DEFAULT_FRONT_URL: &str = "http://localhost:3000";

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Which item repository backs the service.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryBackend {
    /// Flat JSON document at `storage.items_file`.
    Json,
    /// SQLite database at `storage.database.url`.
    Sqlite,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: RepositoryBackend,
    pub items_file: PathBuf,
    pub database: DatabaseConfig,
    pub images_dir: PathBuf,
    /// Served when a requested image is missing; also recorded for items
    /// added without an image.
    pub default_image: String,
    /// Maximum accepted image size in bytes.
    pub max_image_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9000)?
            .set_default("server.cors.allow_origins", vec![DEFAULT_FRONT_URL])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.backend", "sqlite")?
            .set_default("storage.items_file", "items.json")?
            .set_default("storage.database.url", "sqlite://mercari.sqlite3?mode=rwc")?
            .set_default("storage.images_dir", "images")?
            .set_default("storage.default_image", "default.jpg")?
            .set_default("storage.max_image_size", 16 * 1024 * 1024)?
            // Load from config/config.{toml,ini,...}
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., MERCARI__STORAGE__BACKEND=json)
            .add_source(Environment::with_prefix("MERCARI").separator("__"));

        if let Ok(front_url) = std::env::var("FRONT_URL") {
            builder = builder.set_override("server.cors.allow_origins", vec![front_url])?;
        }

        builder.build()?.try_deserialize()
    }
}
