//! Request handlers.
//!
//! Handlers extract the caller, delegate to the lifecycle services in
//! `intake_lifecycle` (or a repository for caller-scoped reads) and map errors
//! via [`AppError`](crate::error::AppError).

pub mod category;
pub mod dashboard;
pub mod notification;
pub mod project;
