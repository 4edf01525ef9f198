//! HTTP API application wiring (Axum router + collaborator wiring).
//!
//! - `services.rs`: collaborator wiring (validator, invoice/customer services, envelopes)
//! - `routes/`: HTTP routes + handlers
//! - `envelope.rs`: success/error envelopes and transaction contexts
//! - `errors.rs`: errors raised before an envelope is built

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;

pub mod envelope;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router with the default collaborators.
pub fn build_app(config: &ApiConfig) -> Router {
    build_app_with(Arc::new(services::build_services()), config)
}

/// Build the full HTTP router around the given collaborators.
pub fn build_app_with(services: Arc<services::AppServices>, config: &ApiConfig) -> Router {
    // Any origin may call the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(config.cors_max_age);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/invoice", routes::invoices::router())
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
