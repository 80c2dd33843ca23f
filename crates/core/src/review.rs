//! Admin review decisions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lifecycle::ProjectAction;

/// Comment stored on an approval when the admin leaves none.
pub const DEFAULT_APPROVAL_COMMENT: &str = "Approved";

/// Maximum length of review comments (characters).
pub const MAX_COMMENT_LENGTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    ChangesRequested,
}

impl ReviewDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewDecision::Approved => "APPROVED",
            ReviewDecision::ChangesRequested => "CHANGES_REQUESTED",
        }
    }

    pub fn action(self) -> ProjectAction {
        match self {
            ReviewDecision::Approved => ProjectAction::Approve,
            ReviewDecision::ChangesRequested => ProjectAction::RequestChanges,
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewDecision {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVED" => Ok(ReviewDecision::Approved),
            "CHANGES_REQUESTED" => Ok(ReviewDecision::ChangesRequested),
            other => Err(CoreError::Validation(format!(
                "Invalid decision '{other}'. Must be one of: APPROVED, CHANGES_REQUESTED"
            ))),
        }
    }
}

impl TryFrom<String> for ReviewDecision {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Normalize review comments for storage.
///
/// Approvals default to [`DEFAULT_APPROVAL_COMMENT`]; change requests must
/// tell the producer what to fix.
pub fn normalize_comments(decision: ReviewDecision, comments: Option<&str>) -> Result<String, CoreError> {
    let trimmed = comments.map(str::trim).filter(|c| !c.is_empty());

    if let Some(c) = trimmed {
        if c.chars().count() > MAX_COMMENT_LENGTH {
            return Err(CoreError::Validation(format!(
                "Comments exceed maximum length of {MAX_COMMENT_LENGTH} characters"
            )));
        }
    }

    match (decision, trimmed) {
        (_, Some(c)) => Ok(c.to_string()),
        (ReviewDecision::Approved, None) => Ok(DEFAULT_APPROVAL_COMMENT.to_string()),
        (ReviewDecision::ChangesRequested, None) => Err(CoreError::Validation(
            "Comments are required when requesting changes".into(),
        )),
    }
}
