use axum::{Extension, Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::context::ActorContext;

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

pub async fn whoami(Extension(actor): Extension<ActorContext>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({ "user_id": actor.user_id() })),
    )
        .into_response()
}
