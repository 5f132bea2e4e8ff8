//! # Request Handlers
//!
//! Axum request handlers for the QRIS gateway.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageOutputFormat};
use qris_core::{PaymentStatus, QrisError, QrisResult};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::{error, info, instrument};

/// Prefix of the data URI carrying the generated code
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create QRIS request
#[derive(Debug, Deserialize)]
pub struct CreateQrisRequest {
    /// Amount to charge, in the processor's unit
    pub amount: i64,
    /// Caller's order reference (opaque, echoed back)
    pub order_ref: String,
}

/// Create QRIS response
#[derive(Debug, Serialize, Deserialize)]
pub struct QrisResponse {
    pub order_ref: String,
    pub amount: i64,
    /// `data:image/png;base64,...`
    pub qr_image_base64: String,
}

/// Check payment request
#[derive(Debug, Deserialize)]
pub struct CheckStatusRequest {
    pub order_ref: String,
    pub amount: i64,
}

/// Check payment response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: PaymentStatus,
}

/// Error response, `{"detail": "..."}` as existing callers parse it
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Map a processor failure to a response; the underlying text is kept.
fn qris_error_to_response(context: &str, err: QrisError) -> (StatusCode, Json<ErrorResponse>) {
    error!(upstream = err.is_upstream(), "{}: {}", context, err);

    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(format!("{}: {}", context, err))))
}

/// Encode a bitmap as a PNG data URI
pub fn encode_png_data_uri(image: &DynamicImage) -> QrisResult<String> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageOutputFormat::Png)?;
    Ok(format!(
        "{}{}",
        PNG_DATA_URI_PREFIX,
        STANDARD.encode(buffer.get_ref())
    ))
}

// =============================================================================
// Handlers
// =============================================================================

/// Liveness check
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": format!("{} is running", state.config.service_name)
    }))
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "processor": state.processor.processor_name(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Generate a QRIS code for an order
#[instrument(skip(state, request), fields(order_ref = %request.order_ref, amount = request.amount))]
pub async fn create_qris(
    State(state): State<AppState>,
    Json(request): Json<CreateQrisRequest>,
) -> Result<Json<QrisResponse>, (StatusCode, Json<ErrorResponse>)> {
    let qr_image_base64 = generate_data_uri(&state, request.amount)
        .await
        .map_err(|e| qris_error_to_response("Error generating QR", e))?;

    info!("Generated QR for order {}", request.order_ref);

    Ok(Json(QrisResponse {
        order_ref: request.order_ref,
        amount: request.amount,
        qr_image_base64,
    }))
}

async fn generate_data_uri(state: &AppState, amount: i64) -> QrisResult<String> {
    let generated = state.processor.generate(amount).await?;
    let image = generated.image.ok_or(QrisError::QrGenerationFailed)?;
    encode_png_data_uri(&image)
}

/// Report whether an order has been paid
#[instrument(skip(state, request), fields(order_ref = %request.order_ref, amount = request.amount))]
pub async fn check_payment(
    State(state): State<AppState>,
    Json(request): Json<CheckStatusRequest>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let check = state
        .processor
        .check_payment(&request.order_ref, request.amount)
        .await
        .map_err(|e| qris_error_to_response("Error checking payment", e))?;

    let status = check.status();
    info!(
        "Payment status for {}: {} (processor status {:?})",
        request.order_ref,
        status,
        check.raw_status()
    );

    Ok(Json(StatusResponse { status }))
}
