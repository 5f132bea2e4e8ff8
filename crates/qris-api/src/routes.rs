//! # Routes
//!
//! Axum router configuration for the QRIS gateway.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::trace::TraceLayer;

pub const CREATE_QRIS_PATH: &str = "/create-qris";
pub const CHECK_PAYMENT_PATH: &str = "/check-payment";

/// Routes that require `X-API-KEY`. The gate wraps exactly these entries.
fn protected_routes() -> Vec<(&'static str, MethodRouter<AppState>)> {
    vec![
        (CREATE_QRIS_PATH, post(handlers::create_qris)),
        (CHECK_PAYMENT_PATH, post(handlers::check_payment)),
    ]
}

/// Paths guarded by the API key gate
pub fn protected_paths() -> Vec<&'static str> {
    protected_routes().into_iter().map(|(path, _)| path).collect()
}

/// Create the main application router
///
/// Routes:
/// - Public:
///   - GET  / - Liveness message
///   - GET  /health - Health check
///
/// - Protected (`X-API-KEY`):
///   - POST /create-qris - Generate a QRIS code
///   - POST /check-payment - Poll payment status
pub fn create_router(state: AppState) -> Router {
    let protected = protected_routes()
        .into_iter()
        .fold(Router::<AppState>::new(), |router, (path, route)| router.route(path, route))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    let public = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
