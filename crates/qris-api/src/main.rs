//! # QRIS Gateway
//!
//! HTTP gateway for QRIS generation and payment polling.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export INTERNAL_API_KEY=...
//! export QRIS_AUTH_USERNAME=...
//! export QRIS_AUTH_TOKEN=...
//! export QRIS_BASE_STRING=000201010211...
//!
//! # Run the server
//! qris-gateway
//! ```

use qris_api::{routes, state::AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(fmt::layer))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;

    info!("Environment: {}", state.config.environment);
    info!("QRIS processor: {}", state.processor.processor_name());
    info!("Protected routes: {:?}", routes::protected_paths());

    if !state.config.has_api_key() {
        warn!("INTERNAL_API_KEY is not set; every protected request will be rejected");
    }

    let service_name = state.config.service_name.clone();
    let is_prod = state.config.is_production();

    let app = routes::create_router(state);

    info!("{} starting on http://{}", service_name, addr);

    if !is_prod {
        info!("Liveness: GET http://{}/", addr);
        info!("Generate: POST http://{}{}", addr, routes::CREATE_QRIS_PATH);
        info!("Status: POST http://{}{}", addr, routes::CHECK_PAYMENT_PATH);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{} stopped", service_name);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
