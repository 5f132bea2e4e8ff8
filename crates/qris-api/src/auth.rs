//! # API Key Gate
//!
//! Middleware guarding the protected routes. Callers present the shared
//! secret in `X-API-KEY`; it is compared in constant time.

use crate::handlers::ErrorResponse;
use crate::state::{AppConfig, AppState};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use subtle::ConstantTimeEq;
use tracing::warn;

/// Header carrying the caller's key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Fixed body for rejected requests
pub const FORBIDDEN_MESSAGE: &str = "Forbidden: Invalid API Key";

/// Reject the request unless it carries the configured API key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    if !is_authorized(&state.config, request.headers()) {
        warn!(
            "Rejected {} {}: missing or invalid API key",
            request.method(),
            request.uri().path()
        );
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new(FORBIDDEN_MESSAGE)),
        ));
    }

    Ok(next.run(request).await)
}

/// True when the headers carry a key equal to the configured one.
///
/// An unconfigured key matches nothing.
pub fn is_authorized(config: &AppConfig, headers: &HeaderMap) -> bool {
    let Some(expected) = config.api_key() else {
        return false;
    };

    headers
        .get(API_KEY_HEADER)
        .map(|supplied| keys_match(supplied.as_bytes(), expected))
        .unwrap_or(false)
}

fn keys_match(supplied: &[u8], expected: &[u8]) -> bool {
    supplied.ct_eq(expected).into()
}
