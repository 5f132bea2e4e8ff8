//! # QRIS Processor Trait
//!
//! Boundary to the external QRIS payment collaborator. The gateway only ever
//! talks to the collaborator through this trait, so the HTTP layer can be
//! tested against an in-memory fake and the concrete adapter swapped by
//! configuration.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           QrisProcessor (trait)             │
//! │  ├── generate(amount)                       │
//! │  ├── check_payment(order_ref, amount)       │
//! │  └── processor_name()                       │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!          ┌────────────┴────────────┐
//!  ┌───────┴────────┐       ┌────────┴───────┐
//!  │HttpQrisProcessor│      │ test fakes     │
//!  └────────────────┘       └────────────────┘
//! ```

use crate::error::QrisResult;
use crate::payment::{GeneratedQr, PaymentCheck};
use async_trait::async_trait;
use std::sync::Arc;

/// Operations the gateway needs from the QRIS collaborator.
#[async_trait]
pub trait QrisProcessor: Send + Sync {
    /// Generate a dynamic QR code for `amount`.
    ///
    /// The returned `GeneratedQr` may carry no image; callers decide how to
    /// report that.
    async fn generate(&self, amount: i64) -> QrisResult<GeneratedQr>;

    /// Look up the payment status of `order_ref` for `amount`.
    ///
    /// Both values are forwarded verbatim; the collaborator uses the pair to
    /// tell apart the same reference across amounts.
    async fn check_payment(&self, order_ref: &str, amount: i64) -> QrisResult<PaymentCheck>;

    /// Get the processor name (for logging).
    fn processor_name(&self) -> &'static str;
}

/// Type alias for a shared processor (dynamic dispatch)
pub type BoxedQrisProcessor = Arc<dyn QrisProcessor>;
