use std::sync::Arc;

use axum::{
    extract::{Extension, Form, Path},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use dashboard_core::InvoiceId;
use dashboard_infra::MutationOutcome;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route(
            "/:id",
            get(get_invoice)
                .post(update_invoice)
                .put(update_invoice)
                .delete(delete_invoice),
        )
        .route("/:id/delete", post(delete_invoice))
}

/// Redirects become `303 See Other` so the browser follows up with a GET.
fn outcome_to_response(outcome: MutationOutcome) -> axum::response::Response {
    match outcome {
        MutationOutcome::Redirected { target } => Redirect::to(&target).into_response(),
        completed @ MutationOutcome::Completed => (StatusCode::OK, Json(completed)).into_response(),
    }
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.invoice_listing().await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.invoice(&InvoiceId::new(id)).await {
        Ok(Some(invoice)) => Json(dto::invoice_json(&invoice)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "invoice not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> axum::response::Response {
    let form = dto::invoice_form(pairs);
    match services.invoices().create_invoice(&form, Utc::now()).await {
        Ok(outcome) => outcome_to_response(outcome),
        Err(e) => errors::mutation_error_to_response(e),
    }
}

pub async fn update_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> axum::response::Response {
    let form = dto::invoice_form(pairs);
    match services.invoices().update_invoice(&id, &form).await {
        Ok(outcome) => outcome_to_response(outcome),
        Err(e) => errors::mutation_error_to_response(e),
    }
}

pub async fn delete_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.invoices().delete_invoice(&InvoiceId::new(id)).await {
        Ok(outcome) => outcome_to_response(outcome),
        Err(e) => errors::mutation_error_to_response(e),
    }
}
