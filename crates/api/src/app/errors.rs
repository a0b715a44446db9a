use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use kanmind_auth::AccessError;
use kanmind_core::DomainError;

/// Map an authorization-engine failure to its HTTP shape.
///
/// Denied responses carry the taxonomy kind and a short message only; they
/// never include data about the resource or other users.
pub fn access_error_to_response(err: AccessError) -> axum::response::Response {
    match err {
        AccessError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AccessError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        AccessError::PermissionDenied(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn not_found(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", message)
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
