//! # Server Configuration
//!
//! Environment-based configuration for the dashboard service. A `.env` file
//! is honoured through `dotenvy`; command line flags override both.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Default bind address
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8050";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server bind address
    pub server_addr: SocketAddr,

    /// Airline flight records CSV
    pub airline_data: Option<PathBuf>,

    /// Launch records CSV
    pub launch_data: Option<PathBuf>,

    /// Logging level
    pub log_level: String,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("No dataset configured; set AIRLINE_DATA and/or LAUNCH_DATA")]
    NoDatasets,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = addr
            .parse()
            .map_err(|source| ConfigError::InvalidAddr { value: addr, source })?;

        let path = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        Ok(Self {
            server_addr,
            airline_data: path("AIRLINE_DATA"),
            launch_data: path("LAUNCH_DATA"),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        })
    }

    /// Fail unless at least one dataset will be served.
    pub const fn ensure_datasets(&self) -> Result<(), ConfigError> {
        if self.airline_data.is_none() && self.launch_data.is_none() {
            return Err(ConfigError::NoDatasets);
        }
        Ok(())
    }
}
