//! API endpoint configuration

use crate::error::{Error, Result};
use reqwest::Url;
use std::env;

/// Default address of a locally running zinktray server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Where the zinktray HTTP API lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
}

impl ApiConfig {
    /// Build a configuration from an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base_url` is not an absolute
    /// `http`/`https` URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| {
                Error::Config(format!("Invalid base URL '{base_url}': {e}"))
            })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Unsupported URL scheme '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self { base_url })
    }

    /// Load API configuration from environment variables
    ///
    /// Reads from `.env` file if present. Optional (with default):
    /// - `ZINKTRAY_URL` (default: `http://127.0.0.1:8080`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `ZINKTRAY_URL` is not a valid URL.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("ZINKTRAY_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    /// Resolve an API path such as `/api/mailboxes/list` against the
    /// base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| {
                Error::Config(format!("Invalid endpoint '{path}': {e}"))
            })
    }
}
