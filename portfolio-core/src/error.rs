/// Structured error types for portfolio-core.
///
/// Library consumers get `thiserror` enums; the binary wraps them with
/// `anyhow` context at command boundaries.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for portfolio-core operations
#[derive(Error, Debug)]
pub enum PortfolioError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file could not be parsed
    #[error("Invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config value is present but unusable
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for portfolio-core operations
pub type Result<T> = std::result::Result<T, PortfolioError>;

impl PortfolioError {
    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
