use axum::{routing::get, Router};

pub mod invoices;
pub mod system;

/// Server-sent view invalidations.
pub const EVENTS_PATH: &str = "/dashboard/events";

/// Router for the dashboard endpoints, with the invoice routes mounted at
/// `invoices_path`.
pub fn router(invoices_path: &str) -> Router {
    Router::new()
        .route(EVENTS_PATH, get(system::events))
        .nest(invoices_path, invoices::router())
}
