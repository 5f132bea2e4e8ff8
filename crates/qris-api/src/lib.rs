//! # qris-api
//!
//! HTTP API layer for the QRIS payment gateway.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - API key gate for the protected endpoints
//! - QR generation and payment status endpoints
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Liveness message |
//! | GET | `/health` | Health check |
//! | POST | `/create-qris` | Generate a QRIS code (`X-API-KEY`) |
//! | POST | `/check-payment` | Poll payment status (`X-API-KEY`) |

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
