//! Repository for the append-only `admin_reviews` table.

use intake_core::review::ReviewDecision;
use intake_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::review::AdminReview;

/// Column list for `admin_reviews` queries.
const COLUMNS: &str = "id, project_id, reviewer_id, decision, comments, created_at";

pub struct ReviewRepo;

impl ReviewRepo {
    /// Append a review. There is no update or delete.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
        reviewer_id: DbId,
        decision: ReviewDecision,
        comments: &str,
    ) -> Result<AdminReview, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_reviews (project_id, reviewer_id, decision, comments) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminReview>(&query)
            .bind(project_id)
            .bind(reviewer_id)
            .bind(decision.as_str())
            .bind(comments)
            .fetch_one(executor)
            .await
    }

    /// All reviews of a project, newest first.
    pub async fn list_for_project<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
    ) -> Result<Vec<AdminReview>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_reviews \
             WHERE project_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, AdminReview>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }
}
