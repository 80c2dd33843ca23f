//! Repository for the `question_sets` table.

use intake_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::question::QuestionSet;

/// Column list for `question_sets` queries.
const COLUMNS: &str = "id, category_id, version, is_active, created_at";

pub struct QuestionSetRepo;

impl QuestionSetRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        category_id: DbId,
        version: i32,
        is_active: bool,
    ) -> Result<QuestionSet, sqlx::Error> {
        let query = format!(
            "INSERT INTO question_sets (category_id, version, is_active) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuestionSet>(&query)
            .bind(category_id)
            .bind(version)
            .bind(is_active)
            .fetch_one(executor)
            .await
    }

    /// Version number the next published set of a category will get.
    pub async fn next_version<'e>(
        executor: impl PgExecutor<'e>,
        category_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(MAX(version), 0) + 1 FROM question_sets WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<QuestionSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM question_sets WHERE id = $1");
        sqlx::query_as::<_, QuestionSet>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_active<'e>(
        executor: impl PgExecutor<'e>,
        category_id: DbId,
    ) -> Result<Option<QuestionSet>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM question_sets WHERE category_id = $1 AND is_active");
        sqlx::query_as::<_, QuestionSet>(&query)
            .bind(category_id)
            .fetch_optional(executor)
            .await
    }

    /// All versions of a category, newest first.
    pub async fn list_for_category<'e>(
        executor: impl PgExecutor<'e>,
        category_id: DbId,
    ) -> Result<Vec<QuestionSet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM question_sets WHERE category_id = $1 ORDER BY version DESC"
        );
        sqlx::query_as::<_, QuestionSet>(&query)
            .bind(category_id)
            .fetch_all(executor)
            .await
    }

    /// Clear the active flag on every set of a category.
    pub async fn deactivate_for_category<'e>(
        executor: impl PgExecutor<'e>,
        category_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE question_sets SET is_active = false WHERE category_id = $1 AND is_active",
        )
        .bind(category_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_active<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<QuestionSet>, sqlx::Error> {
        let query =
            format!("UPDATE question_sets SET is_active = true WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, QuestionSet>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
