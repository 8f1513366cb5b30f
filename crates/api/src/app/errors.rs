use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockpile_core::DomainError;
use stockpile_infra::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::Backend { .. } => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            err.to_string(),
        ),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::Conflict { .. } => json_error(StatusCode::CONFLICT, "conflict", message),
        DomainError::Validation(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message)
        }
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
    }
}

/// Malformed JSON bodies keep the extractor's status; well-formed bodies
/// with missing or mistyped fields are validation errors.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    let status = rejection.status();
    let code = if status == StatusCode::UNPROCESSABLE_ENTITY {
        "validation_error"
    } else {
        "invalid_body"
    };
    json_error(status, code, rejection.body_text())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
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
