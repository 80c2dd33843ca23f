//! Repository for the `projects` table.

use intake_core::lifecycle::ProjectStatus;
use intake_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::dashboard::StatusCount;
use crate::models::project::{NewProject, Project, ProjectFilter, ProjectSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, category_id, client_id, created_by, submitted_by, status, \
    is_paid, paid_at, final_revenue, commission_paid, created_at, updated_at";

/// Same columns, qualified for queries joining `projects p`.
const JOINED_COLUMNS: &str = "\
    p.id, p.name, p.category_id, p.client_id, p.created_by, p.submitted_by, p.status, \
    p.is_paid, p.paid_at, p.final_revenue, p.commission_paid, p.created_at, p.updated_at, \
    c.name AS category_name, cl.company_name AS client_name";

pub struct ProjectRepo;

impl ProjectRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &NewProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, category_id, client_id, created_by, submitted_by, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(input.category_id)
            .bind(input.client_id)
            .bind(input.created_by)
            .bind(input.submitted_by)
            .bind(input.status.as_str())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Fetch and row-lock a project for the rest of the transaction.
    pub async fn find_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Project with category and client names.
    pub async fn find_summary<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM projects p \
             JOIN categories c ON c.id = p.category_id \
             JOIN clients cl ON cl.id = p.client_id \
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List projects matching `filter`, most recently updated first.
    pub async fn list<'e>(
        executor: impl PgExecutor<'e>,
        filter: &ProjectFilter,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if filter.status.is_some() {
            conditions.push(format!("p.status = ${param_idx}"));
            param_idx += 1;
        }
        if filter.category_id.is_some() {
            conditions.push(format!("p.category_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.client_id.is_some() {
            conditions.push(format!("p.client_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.is_paid.is_some() {
            conditions.push(format!("p.is_paid = ${param_idx}"));
            param_idx += 1;
        }
        if filter.submitted_by.is_some() {
            conditions.push(format!("p.submitted_by = ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM projects p \
             JOIN categories c ON c.id = p.category_id \
             JOIN clients cl ON cl.id = p.client_id \
             {where_clause} \
             ORDER BY p.updated_at DESC, p.id"
        );

        let mut q = sqlx::query_as::<_, ProjectSummary>(&query);
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(category_id) = filter.category_id {
            q = q.bind(category_id);
        }
        if let Some(client_id) = filter.client_id {
            q = q.bind(client_id);
        }
        if let Some(is_paid) = filter.is_paid {
            q = q.bind(is_paid);
        }
        if let Some(submitted_by) = filter.submitted_by {
            q = q.bind(submitted_by);
        }

        q.fetch_all(executor).await
    }

    /// Rename a project. Returns `None` if it does not exist.
    pub async fn update_name<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        name: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("UPDATE projects SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Move a project from `expected` to `next`.
    ///
    /// Returns `None` when the project is gone or no longer in `expected`,
    /// so a concurrent transition can never be overwritten.
    pub async fn transition<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        expected: ProjectStatus,
        next: ProjectStatus,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = $3 \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(next.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Record payment. Returns `None` when the project is gone or already paid.
    pub async fn mark_paid<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        final_revenue: f64,
        commission_paid: f64,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects \
             SET is_paid = true, paid_at = NOW(), final_revenue = $2, commission_paid = $3 \
             WHERE id = $1 AND NOT is_paid \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(final_revenue)
            .bind(commission_paid)
            .fetch_optional(executor)
            .await
    }

    /// Permanently delete a project; answers, reviews and SOWs cascade.
    /// Returns `true` if a row was removed.
    pub async fn hard_delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Project counts grouped by status.
    pub async fn count_by_status<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM projects GROUP BY status ORDER BY status",
        )
        .fetch_all(executor)
        .await
    }
}
