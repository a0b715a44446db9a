//! `kanmind-infra` — the persistence collaborator.
//!
//! Exposes the storage contract the core consumes (`BoardStore`: lookup by
//! id, filtered queries, cascading deletes, a user directory) plus the
//! resource loader that hydrates relation chains for object-level
//! authorization checks.

pub mod loader;
pub mod store;

pub use loader::{CommentView, Loader, TaskView, board_facts};
pub use store::{BoardStore, InMemoryBoardStore};
