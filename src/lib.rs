//! Identity Insights Demo
//!
//! A small web service that verifies phone numbers against an identity
//! insights API (format, carrier, SIM swap, roaming, reachability, location
//! and subscriber match) and a legacy number insight API, and serves the
//! single-page form that drives it.
//!
//! # Modules
//!
//! - `client`: Live/mock identity client selected at startup.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `insights`: Upstream request composition and response normalization.
//! - `mock_data`: Randomized payloads for credential-less mode.
//! - `models`: API request/response models.
//! - `token`: Bearer token signing.
//! - `upstream_models`: Upstream API wire formats.

pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod insights;
pub mod mock_data;
pub mod models;
pub mod token;
pub mod upstream_models;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::AppState;

/// Maximum accepted request body (1 MiB).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the full application router: probes, API routes and the static frontend.
pub fn app(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.frontend_url)?;
    let static_files = ServeDir::new(&state.config.static_dir);

    let api_routes = Router::new()
        .route("/api/test", get(handlers::smoke_test))
        .route("/api/identity/phone-match", post(handlers::phone_match))
        .route("/api/identity/number-verify", post(handlers::number_verify))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)));

    let app = Router::new()
        .route("/_/health", get(handlers::health))
        .route("/_/metrics", get(handlers::metrics))
        .merge(api_routes)
        .fallback_service(static_files)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}

/// CORS for the configured frontend origin; `*` allows any origin.
fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::exact(
            HeaderValue::from_str(origin)
                .map_err(|e| anyhow::anyhow!("FRONTEND_URL is not a valid origin: {}", e))?,
        )
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}
