//! # QRIS Error Types
//!
//! Typed error handling for the QRIS gateway.
//! All collaborator operations return `Result<T, QrisError>`.

use thiserror::Error;

/// Core error type for all QRIS operations
#[derive(Debug, Error)]
pub enum QrisError {
    /// Configuration errors (missing credentials, missing base string)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network/HTTP error communicating with the processor
    #[error("Network error: {0}")]
    Network(String),

    /// Processor answered with a non-success HTTP status
    #[error("Processor error [{processor}]: {message}")]
    Provider { processor: String, message: String },

    /// Processor answered with a body that does not match the expected contract
    #[error("Malformed processor response: {0}")]
    MalformedResponse(String),

    /// QR bitmap could not be rendered from the payload
    #[error("QR rendering failed: {0}")]
    Rendering(String),

    /// Bitmap could not be encoded to PNG
    #[error("Image encoding failed: {0}")]
    Encoding(String),

    /// Processor returned no image
    #[error("QR generation failed")]
    QrGenerationFailed,

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QrisError {
    /// Returns true if the fault originated at the external processor
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            QrisError::Network(_) | QrisError::Provider { .. } | QrisError::MalformedResponse(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Every kind collapses to 500; callers treat any failure of the
    /// gateway as a hard failure and re-poll on their own schedule.
    pub fn status_code(&self) -> u16 {
        500
    }
}

impl From<image::ImageError> for QrisError {
    fn from(err: image::ImageError) -> Self {
        QrisError::Encoding(err.to_string())
    }
}

/// Result type alias for QRIS operations
pub type QrisResult<T> = Result<T, QrisError>;
