use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use kanmind_auth::{AccessError, CreateTarget, ParentRef, ResourceKind, Verb, check, precheck};
use kanmind_board::{Task, TaskPatch};
use kanmind_core::{TaskId, UserId};
use kanmind_infra::board_facts;

use crate::app::routes::comments;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_task))
        .route("/assigned-to-me", get(assigned_to_me))
        .route("/reviewing", get(reviewing))
        .route(
            "/:task_id",
            get(get_task).patch(patch_task).delete(delete_task),
        )
        .route(
            "/:task_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/:task_id/comments/:comment_id",
            get(comments::get_comment)
                .patch(comments::patch_comment)
                .delete(comments::delete_comment),
        )
}

pub async fn create_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::CreateTaskRequest>,
) -> axum::response::Response {
    // Phase 1: resolve the board reference and pre-check before any task
    // exists.
    let parent = match body.board.map(|id| services.loader().board(id)) {
        None => ParentRef::Unspecified,
        Some(None) => ParentRef::Absent,
        Some(Some(board)) => ParentRef::Resolved(board_facts(&board, actor.user_id())),
    };
    if let Err(e) = precheck(&CreateTarget::Task(parent)) {
        return errors::access_error_to_response(e);
    }
    // The pre-check rejects requests without a board reference.
    let Some(board_id) = body.board else {
        return errors::access_error_to_response(AccessError::Validation(
            "board is required".to_string(),
        ));
    };

    if let Err(resp) = require_known_user(&services, body.assignee_id, "assignee_id") {
        return resp;
    }
    if let Err(resp) = require_known_user(&services, body.reviewer_id, "reviewer_id") {
        return resp;
    }

    let task = match Task::create(
        TaskId::new(),
        board_id,
        actor.user_id(),
        body.title,
        body.description,
        body.status.unwrap_or_default(),
        body.priority.unwrap_or_default(),
        body.assignee_id,
        body.reviewer_id,
        body.due_date,
    ) {
        Ok(t) => t,
        Err(e) => return errors::domain_error_to_response(e),
    };

    services.store().upsert_task(task.clone());
    tracing::info!(task = %task.id_typed(), board = %board_id, owner = %actor.user_id(), "task created");

    (
        StatusCode::CREATED,
        Json(dto::task_response(services.store(), &task)),
    )
        .into_response()
}

pub async fn get_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(task_id): Path<TaskId>,
) -> axum::response::Response {
    let Some(view) = services.loader().task_view(task_id) else {
        return errors::not_found("task not found");
    };

    let facts = view.facts(actor.user_id());
    if let Err(e) = check(Verb::Read, ResourceKind::Task, &facts) {
        return errors::access_error_to_response(e);
    }

    (
        StatusCode::OK,
        Json(dto::task_response(services.store(), &view.task)),
    )
        .into_response()
}

pub async fn patch_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(task_id): Path<TaskId>,
    Json(body): Json<dto::PatchTaskRequest>,
) -> axum::response::Response {
    let Some(mut view) = services.loader().task_view(task_id) else {
        return errors::not_found("task not found");
    };

    let facts = view.facts(actor.user_id());
    if let Err(e) = check(Verb::Update, ResourceKind::Task, &facts) {
        return errors::access_error_to_response(e);
    }

    if body.board.is_some() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "a task cannot be moved to another board",
        );
    }
    if let Some(Some(assignee)) = body.assignee_id {
        if let Err(resp) = require_known_user(&services, Some(assignee), "assignee_id") {
            return resp;
        }
    }
    if let Some(Some(reviewer)) = body.reviewer_id {
        if let Err(resp) = require_known_user(&services, Some(reviewer), "reviewer_id") {
            return resp;
        }
    }

    let patch = TaskPatch {
        title: body.title,
        description: body.description,
        status: body.status,
        priority: body.priority,
        assignee: body.assignee_id,
        reviewer: body.reviewer_id,
        due_date: body.due_date,
    };
    if let Err(e) = view.task.apply(patch) {
        return errors::domain_error_to_response(e);
    }

    services.store().upsert_task(view.task.clone());

    (
        StatusCode::OK,
        Json(dto::task_response(services.store(), &view.task)),
    )
        .into_response()
}

pub async fn delete_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(task_id): Path<TaskId>,
) -> axum::response::Response {
    let Some(view) = services.loader().task_view(task_id) else {
        return errors::not_found("task not found");
    };

    let facts = view.facts(actor.user_id());
    if let Err(e) = check(Verb::Delete, ResourceKind::Task, &facts) {
        return errors::access_error_to_response(e);
    }

    services.store().remove_task(task_id);
    tracing::info!(task = %task_id, actor = %actor.user_id(), "task deleted");

    StatusCode::NO_CONTENT.into_response()
}

pub async fn assigned_to_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    role_view(&services, services.store().tasks_assigned_to(actor.user_id()))
}

pub async fn reviewing(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    role_view(&services, services.store().tasks_reviewed_by(actor.user_id()))
}

/// The assignment views are filters, not per-object vetoes: the store query
/// already restricts rows to the actor's role.
fn role_view(services: &AppServices, tasks: Vec<Task>) -> axum::response::Response {
    let items: Vec<dto::TaskResponse> = tasks
        .iter()
        .map(|t| dto::task_response(services.store(), t))
        .collect();
    (StatusCode::OK, Json(items)).into_response()
}

fn require_known_user(
    services: &AppServices,
    user: Option<UserId>,
    field: &str,
) -> Result<(), axum::response::Response> {
    if let Some(user) = user {
        if services.store().user(user).is_none() {
            return Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                format!("{field} refers to an unknown user: {user}"),
            ));
        }
    }
    Ok(())
}
