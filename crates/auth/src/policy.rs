//! Authorization engine: one decision table instead of scattered role checks.
//!
//! Every resource access is evaluated in up to two phases:
//!
//! 1. [`precheck`] — collection-level, runs before a target object exists.
//!    Only creates have interesting rules here; the caller resolves the
//!    parent reference (board for tasks, task for comments) and hands in the
//!    resolution state.
//! 2. [`check`] — object-level, runs once the target instance is loaded,
//!    against [`RelationFacts`] computed once from the hydrated relation
//!    chain.
//!
//! Both phases are pure: no IO, no mutation, no retries. Every combination
//! not explicitly allowed below is denied.

use thiserror::Error;

/// Terminal failure of an authorization evaluation.
///
/// `NotFound` and `Validation` can only come out of the pre-check phase;
/// `PermissionDenied` can come out of either.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

/// Verb class of the incoming request, already normalized by the router
/// (GET→Read, POST→Create, PATCH/PUT→Update, DELETE→Delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Read,
    Create,
    Update,
    Delete,
}

/// Kind of the resource the request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Board,
    Task,
    Comment,
}

/// Relations between the acting user and the loaded resource, computed once
/// per check by the resource loader.
///
/// Facts that do not apply to the resource kind stay `false` (e.g.
/// `is_comment_author` for a board check).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationFacts {
    /// Actor owns the board (directly, or the board the task/comment hangs off).
    pub is_board_owner: bool,
    /// Actor is in the board's member set.
    pub is_board_member: bool,
    /// Actor created the task.
    pub is_task_owner: bool,
    /// Actor authored the comment.
    pub is_comment_author: bool,
    /// Actor is the task's assignee.
    pub is_assignee: bool,
    /// Actor is the task's reviewer.
    pub is_reviewer: bool,
}

impl RelationFacts {
    /// Board-read access: the predicate everything task-scoped derives from.
    pub fn can_read_task(&self) -> bool {
        self.is_board_owner || self.is_board_member
    }

    /// Filter predicate for the assigned-to-me / reviewing list views.
    ///
    /// These views drop rows the actor has no role on instead of denying the
    /// whole request.
    pub fn in_assignment_views(&self) -> bool {
        self.is_assignee || self.is_reviewer
    }
}

/// Resolution state of the parent reference a create request names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// The payload/route did not name a parent at all.
    Unspecified,
    /// A parent was named but no such entity exists.
    Absent,
    /// Parent found; facts relate the actor to it.
    Resolved(RelationFacts),
}

/// What a create request wants to bring into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTarget {
    /// New board. No parent, always allowed for an authenticated actor.
    Board,
    /// New task on the referenced board.
    Task(ParentRef),
    /// New comment on the referenced task (facts taken from the task's board).
    Comment(ParentRef),
}

/// Phase 1: collection-level pre-check for creates.
pub fn precheck(target: &CreateTarget) -> Result<(), AccessError> {
    match target {
        CreateTarget::Board => Ok(()),

        CreateTarget::Task(parent) => match parent {
            ParentRef::Unspecified => {
                Err(AccessError::Validation("board is required".to_string()))
            }
            ParentRef::Absent => Err(AccessError::NotFound("board not found".to_string())),
            ParentRef::Resolved(facts) if facts.can_read_task() => Ok(()),
            ParentRef::Resolved(_) => Err(AccessError::PermissionDenied(
                "only the board owner or a member may create tasks".to_string(),
            )),
        },

        CreateTarget::Comment(parent) => match parent {
            // A comment route without a resolvable task is an absent task,
            // not a malformed payload.
            ParentRef::Unspecified | ParentRef::Absent => {
                Err(AccessError::NotFound("task not found".to_string()))
            }
            ParentRef::Resolved(facts) if facts.can_read_task() => Ok(()),
            ParentRef::Resolved(_) => Err(AccessError::PermissionDenied(
                "only the board owner or a member may comment".to_string(),
            )),
        },
    }
}

/// Phase 2: object-level check against a loaded instance.
///
/// The table below is the complete policy. Anything that falls through is
/// denied; creates never reach this phase (they are pre-checked).
pub fn check(verb: Verb, kind: ResourceKind, facts: &RelationFacts) -> Result<(), AccessError> {
    let allowed = match (kind, verb) {
        (ResourceKind::Board, Verb::Read) => facts.is_board_owner || facts.is_board_member,
        (ResourceKind::Board, Verb::Update) => facts.is_board_owner || facts.is_board_member,
        (ResourceKind::Board, Verb::Delete) => facts.is_board_owner,

        (ResourceKind::Task, Verb::Read) => facts.can_read_task(),
        (ResourceKind::Task, Verb::Update) => facts.can_read_task(),
        // Board ownership overrides task ownership: administrative authority
        // over the board's contents.
        (ResourceKind::Task, Verb::Delete) => facts.is_task_owner || facts.is_board_owner,

        (ResourceKind::Comment, Verb::Read) => facts.can_read_task(),
        (ResourceKind::Comment, Verb::Update) => facts.is_comment_author,
        (ResourceKind::Comment, Verb::Delete) => {
            facts.is_comment_author || facts.is_board_owner
        }

        // Default-deny: unmatched verb/resource combinations are rejected
        // rather than silently falling through.
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(AccessError::PermissionDenied(denial_message(verb, kind)))
    }
}

fn denial_message(verb: Verb, kind: ResourceKind) -> String {
    let verb = match verb {
        Verb::Read => "read",
        Verb::Create => "create",
        Verb::Update => "update",
        Verb::Delete => "delete",
    };
    let kind = match kind {
        ResourceKind::Board => "board",
        ResourceKind::Task => "task",
        ResourceKind::Comment => "comment",
    };
    format!("not permitted to {verb} this {kind}")
}
