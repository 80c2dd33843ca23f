//! Question Schema Store: categories and versioned question sets.
//!
//! A published set is immutable; a category has at most one active set.
//! Reads always go through [`assemble_active_schema`] so every intake form
//! carries a DATE question.

use intake_core::question::{
    assemble_active_schema, validate_question_definition, validate_question_set, SchemaQuestion,
};
use intake_core::types::DbId;
use intake_db::models::category::{Category, CategorySummary};
use intake_db::models::question::{PublishQuestionSet, QuestionSet, QuestionSetWithQuestions};
use intake_db::repositories::{CategoryRepo, QuestionRepo, QuestionSetRepo};
use sqlx::{PgConnection, PgPool};

use crate::error::{LifecycleError, LifecycleResult};

/// Maximum length of a category name.
const MAX_CATEGORY_NAME_LENGTH: usize = 200;

pub struct QuestionSchemaStore {
    pool: PgPool,
}

impl QuestionSchemaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active questions of a category, ordered, with the DATE placeholder
    /// appended when the set has no DATE question.
    pub async fn get_active_questions(&self, category_id: DbId) -> LifecycleResult<Vec<SchemaQuestion>> {
        let mut conn = self.pool.acquire().await?;
        load_active(&mut conn, category_id).await
    }

    pub async fn list_categories(&self) -> LifecycleResult<Vec<CategorySummary>> {
        Ok(CategoryRepo::list_with_active_set(&self.pool).await?)
    }

    pub async fn create_category(&self, name: &str) -> LifecycleResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LifecycleError::validation("Category name is required"));
        }
        if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
            return Err(LifecycleError::validation(format!(
                "Category name exceeds maximum length of {MAX_CATEGORY_NAME_LENGTH} characters"
            )));
        }

        let category = CategoryRepo::create(&self.pool, name).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// All versions of a category, newest first.
    pub async fn list_question_sets(&self, category_id: DbId) -> LifecycleResult<Vec<QuestionSet>> {
        CategoryRepo::find_by_id(&self.pool, category_id)
            .await?
            .ok_or_else(|| LifecycleError::not_found("Category", category_id))?;
        Ok(QuestionSetRepo::list_for_category(&self.pool, category_id).await?)
    }

    /// Publish the next version of a category's question set.
    ///
    /// The category row is locked for the duration so concurrent publishes
    /// get consecutive versions.
    pub async fn publish_question_set(
        &self,
        category_id: DbId,
        input: &PublishQuestionSet,
    ) -> LifecycleResult<QuestionSetWithQuestions> {
        if input.questions.is_empty() {
            return Err(LifecycleError::validation(
                "A question set needs at least one question",
            ));
        }
        for q in &input.questions {
            validate_question_definition(&q.prompt, q.question_type, q.options.as_ref())?;
        }
        let orderings: Vec<i32> = input
            .questions
            .iter()
            .enumerate()
            .map(|(idx, q)| q.ordering.unwrap_or(idx as i32 + 1))
            .collect();
        let shape: Vec<_> = orderings
            .iter()
            .zip(&input.questions)
            .map(|(&ordering, q)| (ordering, q.question_type))
            .collect();
        validate_question_set(&shape)?;

        let mut tx = self.pool.begin().await?;

        CategoryRepo::lock(&mut *tx, category_id)
            .await?
            .ok_or_else(|| LifecycleError::not_found("Category", category_id))?;

        let version = QuestionSetRepo::next_version(&mut *tx, category_id).await?;
        if input.activate {
            QuestionSetRepo::deactivate_for_category(&mut *tx, category_id).await?;
        }
        let set = QuestionSetRepo::create(&mut *tx, category_id, version, input.activate).await?;

        let mut questions = Vec::with_capacity(input.questions.len());
        for (q, &ordering) in input.questions.iter().zip(&orderings) {
            questions.push(QuestionRepo::create(&mut *tx, set.id, q, ordering).await?);
        }

        tx.commit().await?;

        tracing::info!(
            category_id = %category_id,
            question_set_id = %set.id,
            version,
            question_count = questions.len(),
            active = set.is_active,
            "Question set published",
        );

        Ok(QuestionSetWithQuestions { set, questions })
    }

    /// Make `set_id` the active version of its category.
    pub async fn activate_question_set(&self, set_id: DbId) -> LifecycleResult<QuestionSet> {
        let mut tx = self.pool.begin().await?;

        let set = QuestionSetRepo::find_by_id(&mut *tx, set_id)
            .await?
            .ok_or_else(|| LifecycleError::not_found("QuestionSet", set_id))?;
        CategoryRepo::lock(&mut *tx, set.category_id).await?;

        QuestionSetRepo::deactivate_for_category(&mut *tx, set.category_id).await?;
        let activated = QuestionSetRepo::set_active(&mut *tx, set_id)
            .await?
            .ok_or_else(|| LifecycleError::not_found("QuestionSet", set_id))?;

        tx.commit().await?;

        tracing::info!(
            category_id = %activated.category_id,
            question_set_id = %activated.id,
            version = activated.version,
            "Question set activated",
        );
        Ok(activated)
    }
}

/// Load the active schema of a category on an existing connection, so the
/// submission path reads it inside its own transaction.
pub async fn load_active(
    conn: &mut PgConnection,
    category_id: DbId,
) -> LifecycleResult<Vec<SchemaQuestion>> {
    CategoryRepo::find_by_id(&mut *conn, category_id)
        .await?
        .ok_or_else(|| LifecycleError::not_found("Category", category_id))?;

    let questions = match QuestionSetRepo::find_active(&mut *conn, category_id).await? {
        Some(set) => QuestionRepo::list_for_set(&mut *conn, set.id)
            .await?
            .into_iter()
            .map(SchemaQuestion::from)
            .collect(),
        None => Vec::new(),
    };

    Ok(assemble_active_schema(questions))
}
