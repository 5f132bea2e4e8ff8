//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the read-only configuration and the QRIS processor.

use qris_core::BoxedQrisProcessor;
use qris_processor::HttpQrisProcessor;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;

pub const DEFAULT_SERVICE_NAME: &str = "MinerX QRIS Service";

/// Application configuration
#[derive(Debug)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Name reported by the liveness route
    pub service_name: String,
    /// Shared secret callers send in `X-API-KEY`
    pub internal_api_key: Option<Secret<String>>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),
            internal_api_key: std::env::var("INTERNAL_API_KEY").ok().map(Secret::new),
        }
    }

    /// Config with an explicit API key (for testing)
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "test".to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            internal_api_key: Some(Secret::new(api_key.into())),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Configured API key, if present and non-empty.
    ///
    /// `None` locks every protected route.
    pub fn api_key(&self) -> Option<&[u8]> {
        self.internal_api_key
            .as_ref()
            .map(|k| k.expose_secret().as_bytes())
            .filter(|k| !k.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// QRIS processor
    pub processor: BoxedQrisProcessor,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState with the HTTP processor
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let processor = HttpQrisProcessor::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize QRIS processor: {}", e))?;

        Ok(Self::with_processor(config, Arc::new(processor)))
    }

    /// Create state around an existing processor
    pub fn with_processor(config: AppConfig, processor: BoxedQrisProcessor) -> Self {
        Self {
            processor,
            config: Arc::new(config),
        }
    }
}
