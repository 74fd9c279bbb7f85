//! portfolio-core: documents and rules shared by the portfolio API
//!
//! Holds everything that does not touch the network:
//! - Document types for each collection plus their create payloads
//! - Field validation (required, length, e-mail/URL format, date ordering)
//! - Configuration loading (TOML file + environment overrides)

pub mod config;
pub mod error;
pub mod models;

pub use config::PortfolioConfig;
pub use error::{PortfolioError, Result};
pub use models::{Document, Validate, ValidationError};
