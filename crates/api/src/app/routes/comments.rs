use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use kanmind_auth::{CreateTarget, ParentRef, ResourceKind, Verb, check, precheck};
use kanmind_board::Comment;
use kanmind_core::{CommentId, TaskId};
use kanmind_infra::CommentView;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

pub async fn list_comments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(task_id): Path<TaskId>,
) -> axum::response::Response {
    let Some(view) = services.loader().task_view(task_id) else {
        return errors::not_found("task not found");
    };

    let facts = view.facts(actor.user_id());
    if let Err(e) = check(Verb::Read, ResourceKind::Comment, &facts) {
        return errors::access_error_to_response(e);
    }

    let items: Vec<dto::CommentResponse> = services
        .store()
        .comments_on_task(task_id)
        .iter()
        .map(|c| dto::comment_response(services.store(), c))
        .collect();
    (StatusCode::OK, Json(items)).into_response()
}

pub async fn create_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(task_id): Path<TaskId>,
    Json(body): Json<dto::CreateCommentRequest>,
) -> axum::response::Response {
    // Phase 1: the parent task must resolve and the actor must have board
    // read access on it.
    let parent = match services.loader().task_view(task_id) {
        None => ParentRef::Absent,
        Some(view) => ParentRef::Resolved(view.facts(actor.user_id())),
    };
    if let Err(e) = precheck(&CreateTarget::Comment(parent)) {
        return errors::access_error_to_response(e);
    }

    let comment = match Comment::create(
        CommentId::new(),
        task_id,
        actor.user_id(),
        body.content,
        Utc::now(),
    ) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    services.store().upsert_comment(comment.clone());

    (
        StatusCode::CREATED,
        Json(dto::comment_response(services.store(), &comment)),
    )
        .into_response()
}

pub async fn get_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((task_id, comment_id)): Path<(TaskId, CommentId)>,
) -> axum::response::Response {
    let view = match load_on_task(&services, task_id, comment_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let facts = view.facts(actor.user_id());
    if let Err(e) = check(Verb::Read, ResourceKind::Comment, &facts) {
        return errors::access_error_to_response(e);
    }

    (
        StatusCode::OK,
        Json(dto::comment_response(services.store(), &view.comment)),
    )
        .into_response()
}

pub async fn patch_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((task_id, comment_id)): Path<(TaskId, CommentId)>,
    Json(body): Json<dto::PatchCommentRequest>,
) -> axum::response::Response {
    let mut view = match load_on_task(&services, task_id, comment_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let facts = view.facts(actor.user_id());
    if let Err(e) = check(Verb::Update, ResourceKind::Comment, &facts) {
        return errors::access_error_to_response(e);
    }

    if let Err(e) = view.comment.edit(body.content) {
        return errors::domain_error_to_response(e);
    }

    services.store().upsert_comment(view.comment.clone());

    (
        StatusCode::OK,
        Json(dto::comment_response(services.store(), &view.comment)),
    )
        .into_response()
}

pub async fn delete_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path((task_id, comment_id)): Path<(TaskId, CommentId)>,
) -> axum::response::Response {
    let view = match load_on_task(&services, task_id, comment_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let facts = view.facts(actor.user_id());
    if let Err(e) = check(Verb::Delete, ResourceKind::Comment, &facts) {
        return errors::access_error_to_response(e);
    }

    services.store().remove_comment(comment_id);
    tracing::info!(comment = %comment_id, actor = %actor.user_id(), "comment deleted");

    StatusCode::NO_CONTENT.into_response()
}

/// Resolve a comment under its route task. A comment that exists on a
/// different task reads as absent, so comment ids on other tasks are not
/// probeable.
fn load_on_task(
    services: &AppServices,
    task_id: TaskId,
    comment_id: CommentId,
) -> Result<CommentView, axum::response::Response> {
    let view = services
        .loader()
        .comment_view(comment_id)
        .ok_or_else(|| errors::not_found("comment not found"))?;
    if view.task.id_typed() != task_id {
        return Err(errors::not_found("comment not found"));
    }
    Ok(view)
}
