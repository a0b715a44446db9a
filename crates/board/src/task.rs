use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use kanmind_core::{BoardId, DomainError, DomainResult, Entity, TaskId, UserId};

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 255;

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Review,
    Done,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// A task: belongs to exactly one board, fixed at creation.
///
/// `owner` is the creator and immutable. Assignee and reviewer are optional
/// role references and must never point at the same user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    board: BoardId,
    owner: UserId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    assignee: Option<UserId>,
    reviewer: Option<UserId>,
    due_date: Option<NaiveDate>,
}

/// Partial update to a task. `None` fields are left untouched; the inner
/// `Option` on assignee/reviewer/due_date distinguishes "clear" from "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<Option<UserId>>,
    pub reviewer: Option<Option<UserId>>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl Task {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        id: TaskId,
        board: BoardId,
        owner: UserId,
        title: impl Into<String>,
        description: Option<String>,
        status: TaskStatus,
        priority: TaskPriority,
        assignee: Option<UserId>,
        reviewer: Option<UserId>,
        due_date: Option<NaiveDate>,
    ) -> DomainResult<Self> {
        let task = Self {
            id,
            board,
            owner,
            title: validate_title(title.into())?,
            description: validate_description(description)?,
            status,
            priority,
            assignee,
            reviewer,
            due_date,
        };
        task.check_role_invariant()?;
        Ok(task)
    }

    pub fn id_typed(&self) -> TaskId {
        self.id
    }

    pub fn board(&self) -> BoardId {
        self.board
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    pub fn reviewer(&self) -> Option<UserId> {
        self.reviewer
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Apply a partial update. The board reference and owner are not
    /// patchable; the router rejects attempts before getting here.
    pub fn apply(&mut self, patch: TaskPatch) -> DomainResult<()> {
        let mut next = self.clone();

        if let Some(title) = patch.title {
            next.title = validate_title(title)?;
        }
        if let Some(description) = patch.description {
            next.description = validate_description(description)?;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(assignee) = patch.assignee {
            next.assignee = assignee;
        }
        if let Some(reviewer) = patch.reviewer {
            next.reviewer = reviewer;
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = due_date;
        }

        next.check_role_invariant()?;
        *self = next;
        Ok(())
    }

    fn check_role_invariant(&self) -> DomainResult<()> {
        match (self.assignee, self.reviewer) {
            (Some(a), Some(r)) if a == r => Err(DomainError::validation(
                "assignee and reviewer cannot be the same user",
            )),
            _ => Ok(()),
        }
    }
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_title(title: String) -> DomainResult<String> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }
    if title.chars().count() > TITLE_MAX {
        return Err(DomainError::validation(format!(
            "title must be at most {TITLE_MAX} characters"
        )));
    }
    Ok(title)
}

fn validate_description(description: Option<String>) -> DomainResult<Option<String>> {
    match description {
        None => Ok(None),
        Some(d) if d.chars().count() > DESCRIPTION_MAX => Err(DomainError::validation(format!(
            "description must be at most {DESCRIPTION_MAX} characters"
        ))),
        Some(d) => Ok(Some(d)),
    }
}
