//! Aggregate rows for the admin dashboard.

use serde::Serialize;
use sqlx::FromRow;

/// Number of projects in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}
