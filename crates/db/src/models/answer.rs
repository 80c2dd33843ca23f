//! Stored answer models.

use intake_core::answers::{display_prompt, AnswerValue, StoredAnswer};
use intake_core::question::QuestionType;
use intake_core::types::{DbId, QuestionId};
use serde::Serialize;
use sqlx::FromRow;

/// An answer joined with its question's prompt and type.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerWithQuestion {
    pub project_id: DbId,
    pub question_id: QuestionId,
    pub value_text: Option<String>,
    pub value_json: Option<serde_json::Value>,
    pub prompt: Option<String>,
    pub question_type: Option<String>,
    pub ordering: Option<i32>,
}

impl AnswerWithQuestion {
    pub fn as_stored(&self) -> StoredAnswer<'_> {
        StoredAnswer {
            question_id: &self.question_id,
            prompt: self.prompt.as_deref(),
            question_type: self
                .question_type
                .as_deref()
                .and_then(|t| t.parse::<QuestionType>().ok()),
            value_text: self.value_text.as_deref(),
        }
    }

    /// Display form: inferred prompt plus the value as originally submitted.
    pub fn to_display(&self) -> DisplayAnswer {
        DisplayAnswer {
            question_id: self.question_id.clone(),
            prompt: display_prompt(
                self.prompt.as_deref(),
                &self.question_id,
                self.value_text.as_deref(),
            ),
            question_type: self.question_type.clone(),
            value: AnswerValue::render(self.value_text.as_deref(), self.value_json.as_ref()),
        }
    }
}

/// An answer as shown to reviewers and producers.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayAnswer {
    pub question_id: QuestionId,
    pub prompt: String,
    pub question_type: Option<String>,
    pub value: serde_json::Value,
}
