use axum::{Router, routing::get};

pub mod boards;
pub mod comments;
pub mod system;
pub mod tasks;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/email-check", get(users::email_check))
        .nest("/boards", boards::router())
        .nest("/tasks", tasks::router())
}
