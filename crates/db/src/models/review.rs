//! Admin review model. Reviews are append-only.

use intake_core::review::ReviewDecision;
use intake_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `admin_reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminReview {
    pub id: DbId,
    pub project_id: DbId,
    pub reviewer_id: DbId,
    #[sqlx(try_from = "String")]
    pub decision: ReviewDecision,
    pub comments: String,
    pub created_at: Timestamp,
}
