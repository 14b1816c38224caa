use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use dashboard_infra::{MutationError, StoreError};

pub fn mutation_error_to_response(err: MutationError) -> axum::response::Response {
    match err {
        MutationError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "validation_error",
                "message": errors.to_string(),
                "fields": errors.issues(),
            })),
        )
            .into_response(),
        MutationError::Persistence(e) => store_error_to_response(e),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "invoice store failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
