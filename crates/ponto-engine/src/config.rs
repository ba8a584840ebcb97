//! # Environment Configuration
//!
//! The engine reads its configuration once at startup from the
//! environment. The master key is kept as hex here and parsed into key
//! material only where the certificate store is constructed.

use std::path::PathBuf;

use crate::error::EngineError;

/// Process configuration from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Root directory of the artifact store (`PONTO_STORAGE_DIR`).
    pub storage_dir: PathBuf,
    /// Hex-encoded 32-byte password-sealing key (`PONTO_MASTER_KEY`).
    pub master_key_hex: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            storage_dir: PathBuf::from(require("PONTO_STORAGE_DIR")?),
            master_key_hex: require("PONTO_MASTER_KEY")?,
        })
    }
}

fn require(name: &str) -> Result<String, EngineError> {
    std::env::var(name).map_err(|_| EngineError::Config(format!("{name} is not set")))
}
