//! Repository for the `categories` table.

use intake_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::category::{Category, CategorySummary};

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!("INSERT INTO categories (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// All categories with their active set, ordered by name.
    pub async fn list_with_active_set<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<CategorySummary>, sqlx::Error> {
        sqlx::query_as::<_, CategorySummary>(
            "SELECT c.id, c.name, qs.id AS active_question_set_id, \
                    qs.version AS active_version, c.created_at \
             FROM categories c \
             LEFT JOIN question_sets qs ON qs.category_id = c.id AND qs.is_active \
             ORDER BY c.name",
        )
        .fetch_all(executor)
        .await
    }

    /// Lock the category row for the rest of the transaction. Serializes
    /// concurrent publishes so version numbers stay gapless.
    pub async fn lock<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM categories WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
