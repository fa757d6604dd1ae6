//! Service configuration loaded from environment variables.
//!
//! - `HOST` - bind address (default: 0.0.0.0)
//! - `PORT` - listen port (default: 8080)
//! - `CART_STORAGE_DIR` - directory for durable cart storage; in-memory when unset
//! - `CART_STORAGE_KEY` - storage key holding the cart (default: cart)

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::application::cart_store::DEFAULT_CART_KEY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: Option<PathBuf>,
    pub storage_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                ConfigError::InvalidEnvVar("PORT".to_string(), format!("'{}' is not a valid port", raw))
            })?,
            None => 8080,
        };

        let storage_dir = lookup("CART_STORAGE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let storage_key = lookup("CART_STORAGE_KEY").unwrap_or_else(|| DEFAULT_CART_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            storage_dir,
            storage_key,
        })
    }
}
