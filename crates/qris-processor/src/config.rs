//! # Processor Configuration
//!
//! Configuration for the QRIS processor adapter.
//! All secrets are loaded from environment variables.
//!
//! Nothing here is validated at load time: a missing credential surfaces as
//! `QrisError::Configuration` on the first call that needs it.

use qris_core::{QrisError, QrisResult};
use secrecy::{ExposeSecret, Secret};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LOGO_PATH: &str = "./logo.png";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:9000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// QRIS processor configuration
#[derive(Debug)]
pub struct ProcessorConfig {
    /// Processor auth username
    pub auth_username: Option<String>,

    /// Processor auth token
    pub auth_token: Option<Secret<String>>,

    /// Static base QR template the dynamic codes are derived from
    pub base_qr_string: Option<String>,

    /// Logo overlaid at the centre of generated codes
    pub logo_path: PathBuf,

    /// Processor service base URL (for testing/mocking)
    pub api_base_url: String,

    /// Per-request timeout against the processor
    pub timeout: Duration,
}

impl ProcessorConfig {
    /// Load configuration from environment variables.
    ///
    /// Read env vars:
    /// - `QRIS_AUTH_USERNAME`
    /// - `QRIS_AUTH_TOKEN`
    /// - `QRIS_BASE_STRING`
    /// - `QRIS_LOGO_PATH` (default `./logo.png`)
    /// - `QRIS_API_BASE_URL`
    /// - `QRIS_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self {
            auth_username: non_empty_var("QRIS_AUTH_USERNAME"),
            auth_token: non_empty_var("QRIS_AUTH_TOKEN").map(Secret::new),
            base_qr_string: non_empty_var("QRIS_BASE_STRING"),
            logo_path: non_empty_var("QRIS_LOGO_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGO_PATH)),
            api_base_url: non_empty_var("QRIS_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            timeout: non_empty_var("QRIS_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        auth_username: impl Into<String>,
        auth_token: impl Into<String>,
        base_qr_string: impl Into<String>,
    ) -> Self {
        Self {
            auth_username: Some(auth_username.into()),
            auth_token: Some(Secret::new(auth_token.into())),
            base_qr_string: Some(base_qr_string.into()),
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Username and token for basic auth against the processor
    pub fn credentials(&self) -> QrisResult<(&str, &str)> {
        let username = self.auth_username.as_deref().ok_or_else(|| {
            QrisError::Configuration("QRIS_AUTH_USERNAME not set".to_string())
        })?;
        let token = self
            .auth_token
            .as_ref()
            .map(|t| t.expose_secret().as_str())
            .ok_or_else(|| QrisError::Configuration("QRIS_AUTH_TOKEN not set".to_string()))?;
        Ok((username, token))
    }

    pub fn base_qr_string(&self) -> QrisResult<&str> {
        self.base_qr_string
            .as_deref()
            .ok_or_else(|| QrisError::Configuration("QRIS_BASE_STRING not set".to_string()))
    }

    pub fn logo_path(&self) -> &Path {
        &self.logo_path
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set logo path
    pub fn with_logo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = path.into();
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config() {
        let config = ProcessorConfig::new("merchant", "token123", "000201010211");
        let (username, token) = config.credentials().unwrap();
        assert_eq!(username, "merchant");
        assert_eq!(token, "token123");
        assert_eq!(config.base_qr_string().unwrap(), "000201010211");
        assert_eq!(config.logo_path(), Path::new(DEFAULT_LOGO_PATH));
    }

    #[test]
    fn test_missing_values_surface_on_use() {
        let mut config = ProcessorConfig::new("merchant", "token123", "000201010211");
        config.auth_token = None;
        config.base_qr_string = None;

        let err = config.credentials().unwrap_err();
        assert!(err.to_string().contains("QRIS_AUTH_TOKEN"));

        let err = config.base_qr_string().unwrap_err();
        assert!(err.to_string().contains("QRIS_BASE_STRING"));
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let config = ProcessorConfig::new("merchant", "super-secret-token", "000201");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn test_builders() {
        let config = ProcessorConfig::new("u", "t", "b")
            .with_api_base_url("http://127.0.0.1:1234/")
            .with_logo_path("/tmp/logo.png")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.api_base_url, "http://127.0.0.1:1234");
        assert_eq!(config.logo_path(), Path::new("/tmp/logo.png"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_env_defaults_logo_path() {
        env::remove_var("QRIS_LOGO_PATH");

        let config = ProcessorConfig::from_env();
        assert_eq!(config.logo_path(), Path::new(DEFAULT_LOGO_PATH));
    }
}
