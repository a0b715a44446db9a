use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kanmind_core::{CommentId, DomainError, DomainResult, Entity, TaskId, UserId};

/// A comment on a task. Author and creation time are set once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    task: TaskId,
    author: UserId,
    content: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    pub fn create(
        id: CommentId,
        task: TaskId,
        author: UserId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            task,
            author,
            content: validate_content(content.into())?,
            created_at,
        })
    }

    pub fn id_typed(&self) -> CommentId {
        self.id
    }

    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn author(&self) -> UserId {
        self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the comment body. Author and timestamp stay as created.
    pub fn edit(&mut self, content: impl Into<String>) -> DomainResult<()> {
        self.content = validate_content(content.into())?;
        Ok(())
    }
}

impl Entity for Comment {
    type Id = CommentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_content(content: String) -> DomainResult<String> {
    if content.trim().is_empty() {
        return Err(DomainError::validation("content must not be empty"));
    }
    Ok(content)
}
