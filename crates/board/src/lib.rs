//! Task-board domain module.
//!
//! This crate contains the business rules for boards, tasks and comments,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). Who may *do* what is decided elsewhere (`kanmind-auth`); this
//! crate only guards structural invariants.

pub mod board;
pub mod comment;
pub mod task;
pub mod user;

pub use board::Board;
pub use comment::Comment;
pub use task::{Task, TaskPatch, TaskPriority, TaskStatus};
pub use user::UserProfile;
