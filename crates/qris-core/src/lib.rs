//! # qris-core
//!
//! Core types and traits for the QRIS payment gateway.
//!
//! This crate provides:
//! - `QrisProcessor` trait for the external QRIS payment collaborator
//! - `GeneratedQr` and `PaymentCheck`, the typed results of that collaborator
//! - `PaymentStatus`, the two-value status reported to callers
//! - `QrisError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use qris_core::{PaymentStatus, QrisProcessor};
//!
//! let qr = processor.generate(10_000).await?;
//! let image = qr.image.ok_or(QrisError::QrGenerationFailed)?;
//!
//! // Later, poll until paid
//! let check = processor.check_payment("ORD-1", 10_000).await?;
//! if check.status() == PaymentStatus::Paid {
//!     // fulfil the order
//! }
//! ```

pub mod error;
pub mod payment;
pub mod processor;

// Re-exports for convenience
pub use error::{QrisError, QrisResult};
pub use payment::{GeneratedQr, PaymentCheck, PaymentData, PaymentStatus, PAID_MARKER};
pub use processor::{BoxedQrisProcessor, QrisProcessor};
