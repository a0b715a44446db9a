//! `kanmind-api` — HTTP surface for the task-board backend.

pub mod app;
pub mod context;
pub mod middleware;
