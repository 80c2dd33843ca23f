//! Repository for the `sows` table.

use intake_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::sow::Sow;

/// Column list for `sows` queries.
const COLUMNS: &str = "\
    id, project_id, version_number, status, body, created_by, \
    recipient_email, sent_at, created_at, updated_at";

pub struct SowRepo;

impl SowRepo {
    /// Create a DRAFT SOW at the next version for the project.
    pub async fn create_next_version<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
        body: &str,
        created_by: DbId,
    ) -> Result<Sow, sqlx::Error> {
        let query = format!(
            "INSERT INTO sows (project_id, version_number, status, body, created_by) \
             SELECT $1, COALESCE(MAX(version_number), 0) + 1, 'DRAFT', $2, $3 \
             FROM sows WHERE project_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sow>(&query)
            .bind(project_id)
            .bind(body)
            .bind(created_by)
            .fetch_one(executor)
            .await
    }

    /// Highest version of a project's SOW.
    pub async fn latest_for_project<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
    ) -> Result<Option<Sow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sows \
             WHERE project_id = $1 \
             ORDER BY version_number DESC LIMIT 1"
        );
        sqlx::query_as::<_, Sow>(&query)
            .bind(project_id)
            .fetch_optional(executor)
            .await
    }

    /// All SOW versions of a project, newest first.
    pub async fn list_for_project<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
    ) -> Result<Vec<Sow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sows WHERE project_id = $1 ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, Sow>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Mark a SOW as published to `recipient_email`, optionally replacing
    /// its body.
    pub async fn publish<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        recipient_email: &str,
        body_override: Option<&str>,
    ) -> Result<Option<Sow>, sqlx::Error> {
        let query = format!(
            "UPDATE sows \
             SET status = 'PUBLISHED', recipient_email = $2, sent_at = NOW(), \
                 body = COALESCE($3, body) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sow>(&query)
            .bind(id)
            .bind(recipient_email)
            .bind(body_override)
            .fetch_optional(executor)
            .await
    }
}
