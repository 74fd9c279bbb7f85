use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{PortfolioError, Result};

/// Centralized configuration for the portfolio API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub auth: AuthSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    /// Allow any origin. Off means localhost origins only.
    pub cors_permissive: bool,
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_permissive: false,
            request_timeout_secs: 30,
        }
    }
}

/// Connection targets for the document store.
///
/// `local_uri` is always tried first; `remote_uri` only when the local
/// instance cannot be reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub local_uri: String,
    pub remote_uri: Option<String>,
    pub name: String,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            local_uri: "mongodb://127.0.0.1:27017".to_string(),
            remote_uri: None,
            name: "portfolio".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    pub session_ttl_hours: i64,
    pub reset_token_ttl_minutes: i64,
    /// One-time code required by account deletion
    pub delete_account_code: String,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24 * 7,
            reset_token_ttl_minutes: 60,
            delete_account_code: "123456".to_string(),
            secure_cookies: false,
        }
    }
}

impl PortfolioConfig {
    /// Load config from an explicit path, or from ~/.portfolio/config.toml
    /// when it exists, then apply environment overrides.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    tracing::debug!(path = %default_path.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env(|key| env::var(key).ok())?;
        config.check()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| PortfolioError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get config file path: ~/.portfolio/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".portfolio/config.toml")
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("PORTFOLIO_BIND") {
            self.server.bind = bind
                .parse()
                .map_err(|e| PortfolioError::config(format!("PORTFOLIO_BIND '{bind}': {e}")))?;
        }
        if let Some(uri) = lookup("MONGODB_URI_LOCAL") {
            self.database.local_uri = uri;
        }
        if let Some(uri) = lookup("MONGODB_URI") {
            self.database.remote_uri = Some(uri).filter(|u| !u.is_empty());
        }
        if let Some(name) = lookup("MONGODB_DB") {
            self.database.name = name;
        }
        if let Some(code) = lookup("PORTFOLIO_DELETE_CODE") {
            self.auth.delete_account_code = code;
        }
        Ok(())
    }

    /// Reject values that would only fail later at request time
    pub fn check(&self) -> Result<()> {
        if self.database.local_uri.trim().is_empty() {
            return Err(PortfolioError::config("database.local_uri cannot be empty"));
        }
        if self.database.name.trim().is_empty() {
            return Err(PortfolioError::config("database.name cannot be empty"));
        }
        if self.auth.delete_account_code.trim().is_empty() {
            return Err(PortfolioError::config("auth.delete_account_code cannot be empty"));
        }
        if self.auth.session_ttl_hours <= 0 || self.auth.reset_token_ttl_minutes <= 0 {
            return Err(PortfolioError::config("auth TTLs must be positive"));
        }
        Ok(())
    }
}
