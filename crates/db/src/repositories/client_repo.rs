//! Repository for the `clients` table.

use intake_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::client::{Client, CreateClient};

/// Column list for `clients` queries.
const COLUMNS: &str =
    "id, company_name, contact_name, email, is_default, created_at, updated_at";

pub struct ClientRepo;

impl ClientRepo {
    /// Insert a client unless the name (case-insensitive) or the default
    /// slot is already taken. Returns `None` on conflict.
    pub async fn insert_if_absent<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (company_name, contact_name, email, is_default) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.company_name)
            .bind(&input.contact_name)
            .bind(&input.email)
            .bind(input.is_default)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Case-insensitive lookup by company name.
    pub async fn find_by_name<'e>(
        executor: impl PgExecutor<'e>,
        company_name: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM clients WHERE lower(company_name) = lower($1)");
        sqlx::query_as::<_, Client>(&query)
            .bind(company_name)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_default<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE is_default");
        sqlx::query_as::<_, Client>(&query)
            .fetch_optional(executor)
            .await
    }

    pub async fn count_by_name<'e>(
        executor: impl PgExecutor<'e>,
        company_name: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE lower(company_name) = lower($1)")
            .bind(company_name)
            .fetch_one(executor)
            .await
    }
}
