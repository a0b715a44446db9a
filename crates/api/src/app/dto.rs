//! Request/response DTOs and JSON mapping helpers.
//!
//! Response field names follow the public API contract (`owner_id`,
//! `members_data`, kebab-case status values, …); mapping helpers hydrate
//! user-id references into minimal identity projections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use kanmind_board::{Board, Comment, Task, TaskPriority, TaskStatus};
use kanmind_core::{BoardId, UserId};
use kanmind_infra::BoardStore;

// ─── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub title: String,
    #[serde(default)]
    pub members: Option<Vec<UserId>>,
}

#[derive(Debug, Deserialize)]
pub struct PatchBoardRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub members: Option<Vec<UserId>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub board: Option<BoardId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    #[serde(default)]
    pub reviewer_id: Option<UserId>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// PATCH body for a task. Absent fields keep their value; explicit `null`
/// clears assignee/reviewer/due_date.
#[derive(Debug, Default, Deserialize)]
pub struct PatchTaskRequest {
    /// The board reference is fixed at creation; any attempt to patch it is
    /// rejected by the handler.
    #[serde(default, deserialize_with = "double_option")]
    pub board: Option<Option<BoardId>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<UserId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub reviewer_id: Option<Option<UserId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PatchCommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailCheckQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// Distinguish an absent field from an explicit `null` (`None` vs
/// `Some(None)` after `#[serde(default)]`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// Minimal identity projection; the only user data this API ever exposes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: UserId,
    pub email: String,
    pub fullname: String,
}

#[derive(Debug, Serialize)]
pub struct BoardSummary {
    pub id: BoardId,
    pub title: String,
    pub owner_id: UserId,
    pub member_count: usize,
    pub ticket_count: usize,
    pub tasks_to_do_count: usize,
    pub tasks_high_prio_count: usize,
}

#[derive(Debug, Serialize)]
pub struct BoardDetail {
    pub id: BoardId,
    pub title: String,
    pub owner_id: UserId,
    pub members: Vec<UserInfo>,
    pub tasks: Vec<TaskResponse>,
}

#[derive(Debug, Serialize)]
pub struct BoardPatchResponse {
    pub id: BoardId,
    pub title: String,
    pub owner_data: UserInfo,
    pub members_data: Vec<UserInfo>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: kanmind_core::TaskId,
    pub board: BoardId,
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: Option<UserInfo>,
    pub reviewer: Option<UserInfo>,
    pub due_date: Option<NaiveDate>,
    pub comments_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: kanmind_core::CommentId,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ─── Mapping helpers ─────────────────────────────────────────────────────────

/// Hydrate a user reference; unknown ids degrade to an empty projection
/// rather than failing response shaping.
pub fn user_info(store: &dyn BoardStore, id: UserId) -> UserInfo {
    match store.user(id) {
        Some(profile) => UserInfo {
            id: profile.id,
            email: profile.email,
            fullname: profile.fullname,
        },
        None => UserInfo {
            id,
            email: String::new(),
            fullname: String::new(),
        },
    }
}

pub fn board_summary(store: &dyn BoardStore, board: &Board) -> BoardSummary {
    let tasks = store.tasks_on_board(board.id_typed());
    BoardSummary {
        id: board.id_typed(),
        title: board.title().to_string(),
        owner_id: board.owner(),
        member_count: board.member_count(),
        ticket_count: tasks.len(),
        tasks_to_do_count: tasks.iter().filter(|t| t.status() == TaskStatus::ToDo).count(),
        tasks_high_prio_count: tasks
            .iter()
            .filter(|t| t.priority() == TaskPriority::High)
            .count(),
    }
}

pub fn board_detail(store: &dyn BoardStore, board: &Board) -> BoardDetail {
    BoardDetail {
        id: board.id_typed(),
        title: board.title().to_string(),
        owner_id: board.owner(),
        members: board
            .members()
            .iter()
            .map(|&m| user_info(store, m))
            .collect(),
        tasks: store
            .tasks_on_board(board.id_typed())
            .iter()
            .map(|t| task_response(store, t))
            .collect(),
    }
}

pub fn board_patch_response(store: &dyn BoardStore, board: &Board) -> BoardPatchResponse {
    BoardPatchResponse {
        id: board.id_typed(),
        title: board.title().to_string(),
        owner_data: user_info(store, board.owner()),
        members_data: board
            .members()
            .iter()
            .map(|&m| user_info(store, m))
            .collect(),
    }
}

pub fn task_response(store: &dyn BoardStore, task: &Task) -> TaskResponse {
    TaskResponse {
        id: task.id_typed(),
        board: task.board(),
        owner_id: task.owner(),
        title: task.title().to_string(),
        description: task.description().map(str::to_string),
        status: task.status(),
        priority: task.priority(),
        assignee: task.assignee().map(|u| user_info(store, u)),
        reviewer: task.reviewer().map(|u| user_info(store, u)),
        due_date: task.due_date(),
        comments_count: store.comment_count(task.id_typed()),
    }
}

pub fn comment_response(store: &dyn BoardStore, comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id_typed(),
        author: user_info(store, comment.author()).fullname,
        content: comment.content().to_string(),
        created_at: comment.created_at(),
    }
}
