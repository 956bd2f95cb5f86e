//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CREDENTIAL_DIR_NAME: &str = ".cookbook";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub credential_dir: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `COOKBOOK_API_BASE_URL`: default `http://127.0.0.1:8080/v1`
    /// - `COOKBOOK_CREDENTIAL_DIR`: default `$HOME/.cookbook`
    /// - `COOKBOOK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `COOKBOOK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout is set but is not a positive integer.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_base_url = normalize_base_url(
            &std::env::var("COOKBOOK_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned()),
        );
        let credential_dir = std::env::var_os("COOKBOOK_CREDENTIAL_DIR")
            .map_or_else(default_credential_dir, PathBuf::from);
        let timeouts = Timeouts {
            request_secs: env_parse_secs("COOKBOOK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: env_parse_secs("COOKBOOK_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_base_url, credential_dir, timeouts })
    }

    /// Replace the base URL, applying the same normalization as `from_env`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api_base_url = normalize_base_url(base_url);
        self
    }

    #[must_use]
    pub fn with_credential_dir(mut self, dir: PathBuf) -> Self {
        self.credential_dir = dir;
        self
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_credential_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(DEFAULT_CREDENTIAL_DIR_NAME)
}

fn env_parse_secs(key: &str, default: u64) -> Result<u64, ClientError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ClientError::ConfigParse(format!("{key} must be a positive integer, got '{raw}'"))),
        Ok(secs) => Ok(secs),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
