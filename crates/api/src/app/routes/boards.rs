use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use kanmind_auth::{CreateTarget, ResourceKind, Verb, check, precheck};
use kanmind_board::Board;
use kanmind_core::{BoardId, UserId};
use kanmind_infra::board_facts;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_boards).post(create_board))
        .route(
            "/:board_id",
            get(get_board)
                .patch(patch_board)
                .put(patch_board)
                .delete(delete_board),
        )
}

pub async fn list_boards(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    let store = services.store();
    let items: Vec<dto::BoardSummary> = store
        .boards_for(actor.user_id())
        .iter()
        .map(|b| dto::board_summary(store, b))
        .collect();
    (StatusCode::OK, Json(items)).into_response()
}

pub async fn create_board(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(body): Json<dto::CreateBoardRequest>,
) -> axum::response::Response {
    if let Err(e) = precheck(&CreateTarget::Board) {
        return errors::access_error_to_response(e);
    }

    let members = body.members.unwrap_or_default();
    if let Err(resp) = require_known_users(&services, &members, "members") {
        return resp;
    }

    let board = match Board::create(BoardId::new(), body.title, actor.user_id(), members) {
        Ok(b) => b,
        Err(e) => return errors::domain_error_to_response(e),
    };

    services.store().upsert_board(board.clone());
    tracing::info!(board = %board.id_typed(), owner = %actor.user_id(), "board created");

    (
        StatusCode::CREATED,
        Json(dto::board_summary(services.store(), &board)),
    )
        .into_response()
}

pub async fn get_board(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<BoardId>,
) -> axum::response::Response {
    let Some(board) = services.loader().board(board_id) else {
        return errors::not_found("board not found");
    };

    let facts = board_facts(&board, actor.user_id());
    if let Err(e) = check(Verb::Read, ResourceKind::Board, &facts) {
        return errors::access_error_to_response(e);
    }

    (
        StatusCode::OK,
        Json(dto::board_detail(services.store(), &board)),
    )
        .into_response()
}

pub async fn patch_board(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<BoardId>,
    Json(body): Json<dto::PatchBoardRequest>,
) -> axum::response::Response {
    let Some(mut board) = services.loader().board(board_id) else {
        return errors::not_found("board not found");
    };

    let facts = board_facts(&board, actor.user_id());
    if let Err(e) = check(Verb::Update, ResourceKind::Board, &facts) {
        return errors::access_error_to_response(e);
    }

    if let Some(title) = body.title {
        if let Err(e) = board.rename(title) {
            return errors::domain_error_to_response(e);
        }
    }
    if let Some(members) = body.members {
        if let Err(resp) = require_known_users(&services, &members, "members") {
            return resp;
        }
        board.replace_members(members);
    }

    services.store().upsert_board(board.clone());

    (
        StatusCode::OK,
        Json(dto::board_patch_response(services.store(), &board)),
    )
        .into_response()
}

pub async fn delete_board(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(board_id): Path<BoardId>,
) -> axum::response::Response {
    let Some(board) = services.loader().board(board_id) else {
        return errors::not_found("board not found");
    };

    let facts = board_facts(&board, actor.user_id());
    if let Err(e) = check(Verb::Delete, ResourceKind::Board, &facts) {
        return errors::access_error_to_response(e);
    }

    services.store().remove_board(board_id);
    tracing::info!(board = %board_id, actor = %actor.user_id(), "board deleted");

    StatusCode::NO_CONTENT.into_response()
}

/// Member/assignee references must resolve in the user directory.
fn require_known_users(
    services: &AppServices,
    users: &[UserId],
    field: &str,
) -> Result<(), axum::response::Response> {
    for &user in users {
        if services.store().user(user).is_none() {
            return Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                format!("{field} contains an unknown user: {user}"),
            ));
        }
    }
    Ok(())
}
