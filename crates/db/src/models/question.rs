//! Question set and question models.

use intake_core::question::{QuestionType, SchemaQuestion};
use intake_core::types::{DbId, QuestionId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `question_sets` table. Immutable apart from `is_active`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionSet {
    pub id: DbId,
    pub category_id: DbId,
    pub version: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub question_set_id: DbId,
    #[sqlx(try_from = "String")]
    pub question_type: QuestionType,
    pub prompt: String,
    pub help_text: Option<String>,
    pub required: bool,
    pub ordering: i32,
    pub options: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

impl From<Question> for SchemaQuestion {
    fn from(q: Question) -> Self {
        SchemaQuestion {
            id: q.id,
            question_type: q.question_type,
            prompt: q.prompt,
            help_text: q.help_text,
            required: q.required,
            ordering: q.ordering,
            options: q.options,
            is_placeholder: false,
        }
    }
}

/// One question in a set being published.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestion {
    pub question_type: QuestionType,
    pub prompt: String,
    pub help_text: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Defaults to the question's position in the submitted list (1-based).
    pub ordering: Option<i32>,
    pub options: Option<serde_json::Value>,
}

/// DTO for publishing a new question set version.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishQuestionSet {
    pub questions: Vec<CreateQuestion>,
    #[serde(default = "default_activate")]
    pub activate: bool,
}

fn default_activate() -> bool {
    true
}

/// A published set together with its questions. The set's fields are
/// serialized at the top level, beside `questions`.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSetWithQuestions {
    #[serde(flatten)]
    pub set: QuestionSet,
    pub questions: Vec<Question>,
}
