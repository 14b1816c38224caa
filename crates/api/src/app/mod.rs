//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, view cache and invalidation bus wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: form and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let invoices_path = services.invoices().listing_path().to_string();

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(&invoices_path))
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
