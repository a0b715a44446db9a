use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Lookup-by-identity for inviting members: returns the minimal identity
/// projection only, never credential or token material.
pub async fn email_check(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::EmailCheckQuery>,
) -> axum::response::Response {
    let email = match query.email.as_deref() {
        Some(e) if !e.trim().is_empty() => e.trim(),
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "email query parameter is required",
            );
        }
    };

    match services.store().user_by_email(email) {
        Some(profile) => {
            let info = dto::UserInfo {
                id: profile.id,
                email: profile.email,
                fullname: profile.fullname,
            };
            (StatusCode::OK, Json(info)).into_response()
        }
        None => errors::not_found("user not found"),
    }
}
