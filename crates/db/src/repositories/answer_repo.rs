//! Repository for the `answers` table.

use intake_core::answers::ResolvedAnswer;
use intake_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::answer::AnswerWithQuestion;

/// Answer columns joined with the question's prompt, type and ordering.
const JOINED_COLUMNS: &str = "\
    a.project_id, a.question_id, a.value_text, a.value_json, \
    q.prompt, q.question_type, q.ordering";

pub struct AnswerRepo;

impl AnswerRepo {
    /// Insert a batch of resolved answers for a project.
    pub async fn insert_many(
        conn: &mut PgConnection,
        project_id: DbId,
        answers: &[ResolvedAnswer],
    ) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;
        for answer in answers {
            let result = sqlx::query(
                "INSERT INTO answers (project_id, question_id, value_text, value_json) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(project_id)
            .bind(&answer.question_id)
            .bind(&answer.value.text)
            .bind(&answer.value.json)
            .execute(&mut *conn)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// Replace every answer of a project. Run inside a transaction so
    /// readers never see the project without answers.
    pub async fn replace_all(
        conn: &mut PgConnection,
        project_id: DbId,
        answers: &[ResolvedAnswer],
    ) -> Result<u64, sqlx::Error> {
        Self::delete_for_project(&mut *conn, project_id).await?;
        Self::insert_many(conn, project_id, answers).await
    }

    pub async fn delete_for_project<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM answers WHERE project_id = $1")
            .bind(project_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Answers of a project with question details, in question order.
    pub async fn list_for_project<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
    ) -> Result<Vec<AnswerWithQuestion>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM answers a \
             LEFT JOIN questions q ON q.id = a.question_id \
             WHERE a.project_id = $1 \
             ORDER BY q.ordering NULLS LAST, a.created_at, a.question_id"
        );
        sqlx::query_as::<_, AnswerWithQuestion>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Answers of several projects at once, for dashboards.
    pub async fn list_for_projects<'e>(
        executor: impl PgExecutor<'e>,
        project_ids: &[DbId],
    ) -> Result<Vec<AnswerWithQuestion>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM answers a \
             LEFT JOIN questions q ON q.id = a.question_id \
             WHERE a.project_id = ANY($1) \
             ORDER BY a.project_id, q.ordering NULLS LAST, a.created_at, a.question_id"
        );
        sqlx::query_as::<_, AnswerWithQuestion>(&query)
            .bind(project_ids)
            .fetch_all(executor)
            .await
    }

    pub async fn count_for_project<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM answers WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(executor)
            .await
    }
}
