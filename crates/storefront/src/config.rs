//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ESSENZA_API_BASE_URL` - Base URL of the remote catalog API
//!
//! ## Optional
//! - `ESSENZA_DATA_DIR` - Root directory for the file-backed store
//!   (default: `./essenza-data`)
//! - `ESSENZA_API_TIMEOUT_SECS` - Fixed HTTP timeout for catalog requests
//!   (default: 10; there is no retry policy)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default catalog request timeout in seconds.
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Default file-store root.
const DEFAULT_DATA_DIR: &str = "./essenza-data";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote catalog API settings.
    pub catalog: CatalogConfig,
    /// Root directory for the file-backed store.
    pub data_dir: PathBuf,
}

/// Remote catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the remote API.
    pub base_url: Url,
    /// Fixed request timeout; requests are never retried.
    pub timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("ESSENZA_API_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("ESSENZA_API_BASE_URL".to_owned(), e.to_string())
        })?;

        let timeout_secs = get_env_or_default(
            "ESSENZA_API_TIMEOUT_SECS",
            &DEFAULT_API_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ESSENZA_API_TIMEOUT_SECS".to_owned(), e.to_string())
        })?;

        let data_dir = PathBuf::from(get_env_or_default("ESSENZA_DATA_DIR", DEFAULT_DATA_DIR));

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            data_dir,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
