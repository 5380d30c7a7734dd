//! Service configuration
//!
//! Defaults suit local development; every knob can be overridden through
//! `APP_*` environment variables (`APP_PORT`, `APP_STORAGE_BACKEND`, ...).

use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Which document store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Postgres via `DATABASE_URL`
    Postgres,
    /// In-memory store, for development and tests; data is lost on restart
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Port the HTTP server listens on
    pub port: u16,
    /// Document store backend
    pub storage_backend: StorageBackend,
    /// Directory uploaded images are written to and served from
    pub image_root: String,
    /// How long a login session stays valid
    pub session_ttl_seconds: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("port", "3000")?
            .set_default("storage_backend", "postgres")?
            .set_default("image_root", "images")?
            .set_default("session_ttl_seconds", "86400")?
            .add_source(Environment::with_prefix("APP"))
            .build()?;

        config.try_deserialize()
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }
}
