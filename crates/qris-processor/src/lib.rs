//! # qris-processor
//!
//! Adapter for the external QRIS payment processor.
//!
//! `HttpQrisProcessor` implements `qris_core::QrisProcessor`:
//!
//! - **generate** asks the processor service for a dynamic payload derived
//!   from the configured base QR string, then renders it locally with the
//!   configured logo at the centre
//! - **check_payment** forwards the order reference and amount and returns
//!   the typed `PaymentCheck`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qris_processor::HttpQrisProcessor;
//! use qris_core::QrisProcessor;
//!
//! let processor = HttpQrisProcessor::from_env()?;
//! let qr = processor.generate(10_000).await?;
//! ```

pub mod client;
pub mod config;
pub mod render;

// Re-exports
pub use client::HttpQrisProcessor;
pub use config::ProcessorConfig;
pub use render::render_qr;
