//! Client configuration for reaching the notes service.
//!
//! `ApiConfig` is shared by every Notely front end. Values come from the
//! environment or are supplied explicitly by the caller (the CLI layers its
//! profile file on top).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// Environment variable overriding the base URL.
pub const API_URL_ENV: &str = "NOTELY_API_URL";
/// Environment variable overriding the request timeout, in seconds.
pub const API_TIMEOUT_ENV: &str = "NOTELY_API_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the notes service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Normalized base URL without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Build a config for an explicit base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            ..Self::default()
        })
    }

    /// Resolve configuration from `NOTELY_API_URL` / `NOTELY_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(API_TIMEOUT_ENV).ok(),
        )
    }

    /// Resolve configuration from optional raw values, falling back to defaults.
    pub fn resolve(base_url: Option<String>, timeout_secs: Option<String>) -> Result<Self> {
        let base_url = match normalize_text_option(base_url) {
            Some(url) => normalize_base_url(&url)?,
            None => DEFAULT_API_BASE_URL.to_string(),
        };
        let timeout_secs = match normalize_text_option(timeout_secs) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            base_url,
            timeout_secs,
        })
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Trim the URL, require an http(s) scheme, and drop any trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(Error::Config("API base URL must not be empty".to_string()));
    }
    if !is_http_url(value) {
        return Err(Error::Config(format!(
            "API base URL must include http:// or https:// (got '{value}')"
        )));
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn parse_timeout(raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(Error::Config(format!(
            "{API_TIMEOUT_ENV} must be a positive number of seconds (got '{raw}')"
        ))),
        Ok(secs) => Ok(secs),
    }
}
