//! Repository for the `questions` table.

use intake_core::types::{DbId, QuestionId};
use sqlx::PgExecutor;

use crate::models::question::{CreateQuestion, Question};

/// Column list for `questions` queries.
const COLUMNS: &str = "\
    id, question_set_id, question_type, prompt, help_text, \
    required, ordering, options, created_at";

pub struct QuestionRepo;

impl QuestionRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        question_set_id: DbId,
        input: &CreateQuestion,
        ordering: i32,
    ) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions \
                (question_set_id, question_type, prompt, help_text, required, ordering, options) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(question_set_id)
            .bind(input.question_type.as_str())
            .bind(input.prompt.trim())
            .bind(&input.help_text)
            .bind(input.required)
            .bind(ordering)
            .bind(&input.options)
            .fetch_one(executor)
            .await
    }

    /// Questions of one set, in display order.
    pub async fn list_for_set<'e>(
        executor: impl PgExecutor<'e>,
        question_set_id: DbId,
    ) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions \
             WHERE question_set_id = $1 \
             ORDER BY ordering, id"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(question_set_id)
            .fetch_all(executor)
            .await
    }

    /// The subset of `ids` that exist in any question set of `category_id`,
    /// active or not.
    pub async fn existing_ids<'e>(
        executor: impl PgExecutor<'e>,
        category_id: DbId,
        ids: &[QuestionId],
    ) -> Result<Vec<QuestionId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar(
            "SELECT q.id FROM questions q \
             JOIN question_sets s ON s.id = q.question_set_id \
             WHERE s.category_id = $1 AND q.id = ANY($2) \
             ORDER BY q.id",
        )
        .bind(category_id)
        .bind(ids)
        .fetch_all(executor)
        .await
    }
}
