//! # HTTP QRIS Processor
//!
//! `QrisProcessor` implementation backed by the QRIS processor service.
//! Dynamic payloads come from the service; rendering happens locally.

use crate::config::ProcessorConfig;
use crate::render::{load_logo, render_qr};
use async_trait::async_trait;
use image::DynamicImage;
use qris_core::{GeneratedQr, PaymentCheck, QrisError, QrisProcessor, QrisResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

const PROCESSOR_NAME: &str = "qris-http";

/// QRIS processor talking to the processor service over HTTP
pub struct HttpQrisProcessor {
    config: ProcessorConfig,
    client: Client,
    /// Decoded once at construction
    logo: Option<Arc<DynamicImage>>,
}

impl HttpQrisProcessor {
    /// Create a new processor, decoding the configured logo if present
    pub fn new(config: ProcessorConfig) -> QrisResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| QrisError::Configuration(format!("HTTP client: {}", e)))?;

        let logo = load_logo(config.logo_path())?.map(Arc::new);

        Ok(Self {
            config,
            client,
            logo,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> QrisResult<Self> {
        Self::new(ProcessorConfig::from_env())
    }

    /// POST a JSON body and return the raw success body
    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> QrisResult<Vec<u8>> {
        let (username, token) = self.config.credentials()?;
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .client
            .post(&url)
            .basic_auth(username, Some(token))
            .json(body)
            .send()
            .await
            .map_err(|e| QrisError::Network(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| QrisError::Network(e.to_string()))?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            error!("Processor API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_slice::<ProcessorErrorResponse>(&bytes) {
                return Err(QrisError::Provider {
                    processor: PROCESSOR_NAME.to_string(),
                    message: format!("HTTP {}: {}", status, error_response.message),
                });
            }

            return Err(QrisError::Provider {
                processor: PROCESSOR_NAME.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl QrisProcessor for HttpQrisProcessor {
    #[instrument(skip(self))]
    async fn generate(&self, amount: i64) -> QrisResult<GeneratedQr> {
        let base_qr_string = self.config.base_qr_string()?;

        let body = self
            .post_json(
                "/qris/generate",
                &GenerateRequest {
                    base_qr_string,
                    amount,
                },
            )
            .await?;

        let response: GenerateResponse = serde_json::from_slice(&body)
            .map_err(|e| QrisError::MalformedResponse(e.to_string()))?;

        let qr_string = match response.data.and_then(|d| d.qr_string) {
            Some(qr) if response.success && !qr.is_empty() => qr,
            _ => {
                warn!(
                    "Processor returned no QR payload: {}",
                    response.message.as_deref().unwrap_or("no message")
                );
                return Ok(GeneratedQr::empty(""));
            }
        };

        debug!("Received dynamic QR payload: {} bytes", qr_string.len());

        let logo = self.logo.clone();
        let payload = qr_string.clone();
        let image = tokio::task::spawn_blocking(move || render_qr(&payload, logo.as_deref()))
            .await
            .map_err(|e| QrisError::Internal(format!("render task: {}", e)))??;

        info!("Generated QR for amount={}", amount);

        Ok(GeneratedQr::new(qr_string, image))
    }

    #[instrument(skip(self))]
    async fn check_payment(&self, order_ref: &str, amount: i64) -> QrisResult<PaymentCheck> {
        let body = self
            .post_json("/qris/status", &StatusRequest { order_ref, amount })
            .await?;

        let check = PaymentCheck::from_slice(&body)?;

        debug!(
            "Payment check: success={}, status={:?}",
            check.success,
            check.raw_status()
        );

        Ok(check)
    }

    fn processor_name(&self) -> &'static str {
        PROCESSOR_NAME
    }
}

// =============================================================================
// Processor API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    base_qr_string: &'a str,
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    success: bool,
    #[serde(default)]
    data: Option<GenerateData>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateData {
    #[serde(default)]
    qr_string: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusRequest<'a> {
    order_ref: &'a str,
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct ProcessorErrorResponse {
    message: String,
}
