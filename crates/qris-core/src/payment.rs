//! # Payment Types
//!
//! Typed results of the QRIS collaborator and the status reported to callers.

use crate::error::{QrisError, QrisResult};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Status value the collaborator uses for a settled payment
pub const PAID_MARKER: &str = "PAID";

/// Payment status reported to callers.
///
/// Anything that is not a confirmed payment is `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a QR generation call
#[derive(Debug, Clone)]
pub struct GeneratedQr {
    /// Dynamic QRIS payload the image encodes
    pub qr_string: String,
    /// Rendered bitmap, absent when the collaborator produced none
    pub image: Option<DynamicImage>,
}

impl GeneratedQr {
    pub fn new(qr_string: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            qr_string: qr_string.into(),
            image: Some(image),
        }
    }

    /// A result carrying no image
    pub fn empty(qr_string: impl Into<String>) -> Self {
        Self {
            qr_string: qr_string.into(),
            image: None,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Result of a payment status lookup.
///
/// `success` is required; a body without it is a contract violation and is
/// rejected as `QrisError::MalformedResponse` instead of reading as pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCheck {
    pub success: bool,
    #[serde(default)]
    pub data: Option<PaymentData>,
}

/// Nested payment details returned by the collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentData {
    #[serde(default)]
    pub status: Option<String>,
    /// Fields this gateway does not interpret (amount, date, issuer, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaymentCheck {
    /// A successful lookup with the given nested status
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(PaymentData {
                status: Some(status.into()),
                extra: serde_json::Map::new(),
            }),
        }
    }

    /// A failed lookup (no matching mutation, upstream said no)
    pub fn unsuccessful() -> Self {
        Self {
            success: false,
            data: None,
        }
    }

    /// Parse a collaborator response body
    pub fn from_slice(body: &[u8]) -> QrisResult<Self> {
        serde_json::from_slice(body).map_err(|e| QrisError::MalformedResponse(e.to_string()))
    }

    /// Parse an already-decoded collaborator response
    pub fn from_value(value: serde_json::Value) -> QrisResult<Self> {
        serde_json::from_value(value).map_err(|e| QrisError::MalformedResponse(e.to_string()))
    }

    /// Nested status string, if any
    pub fn raw_status(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.status.as_deref())
    }

    /// `Paid` only when `success` is true and the nested status is the paid marker
    pub fn status(&self) -> PaymentStatus {
        if self.success && self.raw_status() == Some(PAID_MARKER) {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        }
    }
}
