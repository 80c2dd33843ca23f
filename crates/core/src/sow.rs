//! Statement of Work template.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::answers::StoredAnswer;
use crate::error::CoreError;
use crate::question::QuestionType;

/// Placeholder for fields with no matching answer.
pub const MISSING_FIELD: &str = "N/A";

/// Fixed scope section of every generated SOW.
pub const SCOPE_OF_SERVICES: &[&str] = &[
    "Pre-production: Concept, script, and storyboard.",
    "Production: Filming on location (1 day).",
    "Post-production: Editing, color grading, sound mixing.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SowStatus {
    Draft,
    Published,
}

impl SowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SowStatus::Draft => "DRAFT",
            SowStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for SowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SowStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(SowStatus::Draft),
            "PUBLISHED" => Ok(SowStatus::Published),
            other => Err(CoreError::Validation(format!("Invalid SOW status '{other}'"))),
        }
    }
}

impl TryFrom<String> for SowStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fields pulled out of a project's answers for the SOW body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SowFields<'a> {
    pub description: &'a str,
    pub budget: &'a str,
    pub delivery_date: &'a str,
}

impl<'a> SowFields<'a> {
    pub fn from_answers(answers: &[StoredAnswer<'a>]) -> Self {
        let find = |matches: &dyn Fn(&StoredAnswer<'a>) -> bool| {
            answers
                .iter()
                .find(|a| matches(a))
                .and_then(|a| a.value_text)
                .unwrap_or(MISSING_FIELD)
        };
        let prompt_has = |a: &StoredAnswer<'a>, needle: &str| a.prompt.is_some_and(|p| p.contains(needle));

        Self {
            description: find(&|a| {
                a.question_type == Some(QuestionType::LongText) || prompt_has(a, "Description")
            }),
            budget: find(&|a| prompt_has(a, "Budget")),
            delivery_date: find(&|a| {
                a.question_type == Some(QuestionType::Date) || prompt_has(a, "Delivery")
            }),
        }
    }
}

/// Render the markdown body of a new SOW.
pub fn render_sow(
    project_name: &str,
    client_name: Option<&str>,
    date: NaiveDate,
    fields: &SowFields<'_>,
) -> String {
    let scope = SCOPE_OF_SERVICES
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# Statement of Work: {project_name}\n\
         **Client:** {client}\n\
         **Date:** {date}\n\
         \n\
         ## 1. Project Overview\n\
         {description}\n\
         \n\
         ## 2. Scope of Services\n\
         {scope}\n\
         \n\
         ## 3. Timeline\n\
         Target Delivery: {delivery}\n\
         \n\
         ## 4. Financials\n\
         Budget Range: {budget}",
        client = client_name.filter(|c| !c.is_empty()).unwrap_or(MISSING_FIELD),
        date = date.format("%m/%d/%Y"),
        description = fields.description,
        delivery = fields.delivery_date,
        budget = fields.budget,
    )
}
