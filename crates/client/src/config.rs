//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PASS_API_BASE` - Backend API base URL (default: `http://localhost:5000/api`)
//! - `PASS_TOKEN_PATH` - File holding the bearer token
//!   (default: `$HOME/.config/pass/token`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Backend base URL used when `PASS_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

const TOKEN_SUBPATH: [&str; 3] = [".config", "pass", "token"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// PASS client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL, without a trailing slash. Request paths are appended to it.
    pub api_base: String,
    /// Location of the persisted bearer token.
    pub token_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is invalid, or if no token path is
    /// set and no home directory can be found.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = lookup("PASS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
        let api_base = normalize_api_base(&api_base)
            .map_err(|e| ConfigError::InvalidEnvVar("PASS_API_BASE".to_owned(), e))?;

        let token_path = match lookup("PASS_TOKEN_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => {
                let home = lookup("HOME")
                    .or_else(|| lookup("USERPROFILE"))
                    .ok_or_else(|| ConfigError::MissingEnvVar("PASS_TOKEN_PATH".to_owned()))?;
                TOKEN_SUBPATH.iter().fold(PathBuf::from(home), |path, part| path.join(part))
            }
        };

        Ok(Self {
            api_base,
            token_path,
        })
    }

    /// Replace the API base URL (e.g. from a command-line flag).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is not an http(s) URL.
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self, ConfigError> {
        self.api_base = normalize_api_base(api_base)
            .map_err(|e| ConfigError::InvalidEnvVar("--api-base".to_owned(), e))?;
        Ok(self)
    }
}

/// Validate an API base URL and strip its trailing slash.
fn normalize_api_base(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("base URL must not carry a query or fragment".to_owned());
    }
    Ok(url.as_str().trim_end_matches('/').to_owned())
}
