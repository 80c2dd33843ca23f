//! Question schema types and active-schema assembly.
//!
//! A category owns versioned, immutable question sets; exactly one is active
//! at a time. [`assemble_active_schema`] turns the active set's rows into the
//! ordered list handed to intake forms, adding a non-persisted DATE
//! placeholder when the set has no date question.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::QuestionId;

// ---------------------------------------------------------------------------
// QuestionType
// ---------------------------------------------------------------------------

/// Input type of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    ShortText,
    LongText,
    SingleSelect,
    Number,
    Date,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::ShortText,
        QuestionType::LongText,
        QuestionType::SingleSelect,
        QuestionType::Number,
        QuestionType::Date,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::ShortText => "SHORT_TEXT",
            QuestionType::LongText => "LONG_TEXT",
            QuestionType::SingleSelect => "SINGLE_SELECT",
            QuestionType::Number => "NUMBER",
            QuestionType::Date => "DATE",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid question type '{s}'")))
    }
}

impl TryFrom<String> for QuestionType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// SchemaQuestion
// ---------------------------------------------------------------------------

/// Id of the synthesized DATE question. Shaped like a mnemonic key so the
/// answer resolver remaps it and it can never be persisted as a question id.
pub const DATE_PLACEHOLDER_ID: &str = "q_date_fallback";

/// Prompt of the synthesized DATE question.
pub const DATE_PLACEHOLDER_PROMPT: &str = "Target Delivery Date";

/// One question as presented to an intake form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaQuestion {
    pub id: QuestionId,
    pub question_type: QuestionType,
    pub prompt: String,
    pub help_text: Option<String>,
    pub required: bool,
    pub ordering: i32,
    pub options: Option<serde_json::Value>,
    /// `true` only for the synthesized DATE placeholder.
    pub is_placeholder: bool,
}

impl SchemaQuestion {
    fn date_placeholder(ordering: i32) -> Self {
        Self {
            id: DATE_PLACEHOLDER_ID.to_string(),
            question_type: QuestionType::Date,
            prompt: DATE_PLACEHOLDER_PROMPT.to_string(),
            help_text: None,
            required: false,
            ordering,
            options: None,
            is_placeholder: true,
        }
    }
}

/// Order the active set's questions and guarantee a DATE entry.
///
/// Questions are sorted ascending by `ordering` (ties broken by id so the
/// output is deterministic). When no DATE question exists, a placeholder is
/// appended after the last question.
pub fn assemble_active_schema(mut questions: Vec<SchemaQuestion>) -> Vec<SchemaQuestion> {
    questions.sort_by(|a, b| a.ordering.cmp(&b.ordering).then_with(|| a.id.cmp(&b.id)));

    if !questions.iter().any(|q| q.question_type == QuestionType::Date) {
        let next = questions.last().map_or(1, |q| q.ordering.saturating_add(1));
        questions.push(SchemaQuestion::date_placeholder(next));
    }

    questions
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Maximum length of a question prompt.
pub const MAX_PROMPT_LENGTH: usize = 500;

/// Highest ordering a published question may carry.
pub const MAX_QUESTION_ORDERING: i32 = 10_000;

/// Validate a whole set before it is published: orderings must be unique and
/// within `1..=MAX_QUESTION_ORDERING`, and at most one question may be DATE.
pub fn validate_question_set(entries: &[(i32, QuestionType)]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for &(ordering, _) in entries {
        if !(1..=MAX_QUESTION_ORDERING).contains(&ordering) {
            return Err(CoreError::Validation(format!(
                "Question ordering must be between 1 and {MAX_QUESTION_ORDERING}"
            )));
        }
        if !seen.insert(ordering) {
            return Err(CoreError::Validation(format!(
                "Duplicate question ordering {ordering}"
            )));
        }
    }

    let dates = entries
        .iter()
        .filter(|(_, t)| *t == QuestionType::Date)
        .count();
    if dates > 1 {
        return Err(CoreError::Validation(
            "A question set can have at most one DATE question".into(),
        ));
    }

    Ok(())
}

/// Validate a question definition before it is published in a new set.
pub fn validate_question_definition(
    prompt: &str,
    question_type: QuestionType,
    options: Option<&serde_json::Value>,
) -> Result<(), CoreError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(CoreError::Validation("Question prompt is required".into()));
    }
    if prompt.len() > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Question prompt exceeds maximum length of {MAX_PROMPT_LENGTH} characters"
        )));
    }

    if question_type == QuestionType::SingleSelect {
        let has_options = options
            .and_then(|o| o.as_array())
            .is_some_and(|a| !a.is_empty() && a.iter().all(|v| v.is_string()));
        if !has_options {
            return Err(CoreError::Validation(format!(
                "Single-select question '{prompt}' needs a non-empty list of string options"
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn question(id: &str, question_type: QuestionType, ordering: i32) -> SchemaQuestion {
        SchemaQuestion {
            id: id.to_string(),
            question_type,
            prompt: format!("Prompt {id}"),
            help_text: None,
            required: false,
            ordering,
            options: None,
            is_placeholder: false,
        }
    }

    #[test]
    fn question_type_round_trips_through_str() {
        for t in QuestionType::ALL {
            assert_eq!(t.as_str().parse::<QuestionType>().unwrap(), t);
        }
        assert!("CHECKBOX".parse::<QuestionType>().is_err());
    }

    #[test]
    fn sorts_by_ordering() {
        let out = assemble_active_schema(vec![
            question("c", QuestionType::ShortText, 3),
            question("a", QuestionType::Date, 1),
            question("b", QuestionType::LongText, 2),
        ]);
        let order: Vec<_> = out.iter().map(|q| q.ordering).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert!(out.iter().all(|q| !q.is_placeholder));
    }

    #[test]
    fn appends_date_placeholder_when_missing() {
        let out = assemble_active_schema(vec![
            question("a", QuestionType::ShortText, 1),
            question("b", QuestionType::SingleSelect, 4),
        ]);
        assert_eq!(out.len(), 3);
        let last = out.last().unwrap();
        assert!(last.is_placeholder);
        assert_eq!(last.id, DATE_PLACEHOLDER_ID);
        assert_eq!(last.question_type, QuestionType::Date);
        assert_eq!(last.ordering, 5);
        assert!(!last.required);
    }

    #[test]
    fn empty_schema_gets_only_placeholder() {
        let out = assemble_active_schema(vec![]);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_placeholder);
    }

    #[test]
    fn exactly_one_date_entry_and_strictly_sorted() {
        let out = assemble_active_schema(vec![
            question("x", QuestionType::Number, 7),
            question("y", QuestionType::ShortText, 2),
        ]);
        let dates = out
            .iter()
            .filter(|q| q.question_type == QuestionType::Date)
            .count();
        assert_eq!(dates, 1);
        assert!(out.windows(2).all(|w| w[0].ordering < w[1].ordering));
    }

    #[test]
    fn placeholder_after_max_ordering_does_not_overflow() {
        let out = assemble_active_schema(vec![question("a", QuestionType::ShortText, i32::MAX)]);
        assert_eq!(out.len(), 2);
        assert!(out[1].is_placeholder);
        assert_eq!(out[1].ordering, i32::MAX);
    }

    #[test]
    fn question_set_rejects_duplicate_orderings() {
        let result = validate_question_set(&[
            (1, QuestionType::ShortText),
            (2, QuestionType::Number),
            (1, QuestionType::LongText),
        ]);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("Duplicate"));
    }

    #[test]
    fn question_set_rejects_second_date() {
        let result = validate_question_set(&[(1, QuestionType::Date), (2, QuestionType::Date)]);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("DATE"));
    }

    #[test]
    fn question_set_rejects_out_of_range_ordering() {
        assert!(validate_question_set(&[(0, QuestionType::ShortText)]).is_err());
        assert!(validate_question_set(&[(i32::MAX, QuestionType::ShortText)]).is_err());
        assert!(validate_question_set(&[
            (1, QuestionType::Date),
            (MAX_QUESTION_ORDERING, QuestionType::ShortText),
        ])
        .is_ok());
    }

    #[test]
    fn single_select_requires_options() {
        assert!(validate_question_definition("Budget", QuestionType::SingleSelect, None).is_err());
        let opts = serde_json::json!(["$5k - $10k", "$10k - $25k"]);
        assert!(
            validate_question_definition("Budget", QuestionType::SingleSelect, Some(&opts)).is_ok()
        );
    }

    #[test]
    fn blank_prompt_is_invalid() {
        assert!(validate_question_definition("  ", QuestionType::ShortText, None).is_err());
    }
}
