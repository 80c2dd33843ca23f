//! Project status state machine.
//!
//! Status is a closed enum; every change goes through [`ProjectAction`] and
//! the transition table in [`ProjectAction::sources`]. The paid flag is
//! orthogonal and not modelled here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Draft,
    Submitted,
    NeedsRpmUpdate,
    ApprovedForSow,
    SowDraft,
    SowSentToClient,
    ClientApproved,
    InProduction,
    Closed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 9] = [
        ProjectStatus::Draft,
        ProjectStatus::Submitted,
        ProjectStatus::NeedsRpmUpdate,
        ProjectStatus::ApprovedForSow,
        ProjectStatus::SowDraft,
        ProjectStatus::SowSentToClient,
        ProjectStatus::ClientApproved,
        ProjectStatus::InProduction,
        ProjectStatus::Closed,
    ];

    /// Statuses counted as "active" on the admin dashboard.
    pub const ACTIVE: [ProjectStatus; 4] = [
        ProjectStatus::ApprovedForSow,
        ProjectStatus::SowSentToClient,
        ProjectStatus::ClientApproved,
        ProjectStatus::InProduction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "DRAFT",
            ProjectStatus::Submitted => "SUBMITTED",
            ProjectStatus::NeedsRpmUpdate => "NEEDS_RPM_UPDATE",
            ProjectStatus::ApprovedForSow => "APPROVED_FOR_SOW",
            ProjectStatus::SowDraft => "SOW_DRAFT",
            ProjectStatus::SowSentToClient => "SOW_SENT_TO_CLIENT",
            ProjectStatus::ClientApproved => "CLIENT_APPROVED",
            ProjectStatus::InProduction => "IN_PRODUCTION",
            ProjectStatus::Closed => "CLOSED",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ProjectStatus::Closed
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Invalid project status '{s}'")))
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// ProjectAction
// ---------------------------------------------------------------------------

/// Everything that can move a project's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectAction {
    Submit,
    Resubmit,
    Approve,
    RequestChanges,
    GenerateSow,
    SendSow,
    ClientApprove,
    StartProduction,
    Close,
}

const REVIEWABLE: &[ProjectStatus] = &[
    ProjectStatus::Submitted,
    ProjectStatus::NeedsRpmUpdate,
    ProjectStatus::ApprovedForSow,
];

const NOT_CLOSED: &[ProjectStatus] = &[
    ProjectStatus::Draft,
    ProjectStatus::Submitted,
    ProjectStatus::NeedsRpmUpdate,
    ProjectStatus::ApprovedForSow,
    ProjectStatus::SowDraft,
    ProjectStatus::SowSentToClient,
    ProjectStatus::ClientApproved,
    ProjectStatus::InProduction,
];

impl ProjectAction {
    /// Statuses this action may be applied from.
    ///
    /// | Action          | From                                          | To                 |
    /// |-----------------|-----------------------------------------------|--------------------|
    /// | Submit          | DRAFT                                         | SUBMITTED          |
    /// | Resubmit        | NEEDS_RPM_UPDATE, DRAFT                       | DRAFT              |
    /// | Approve         | SUBMITTED, NEEDS_RPM_UPDATE, APPROVED_FOR_SOW | APPROVED_FOR_SOW   |
    /// | RequestChanges  | SUBMITTED, NEEDS_RPM_UPDATE, APPROVED_FOR_SOW | NEEDS_RPM_UPDATE   |
    /// | GenerateSow     | APPROVED_FOR_SOW                              | SOW_DRAFT          |
    /// | SendSow         | SOW_DRAFT                                     | SOW_SENT_TO_CLIENT |
    /// | ClientApprove   | SOW_SENT_TO_CLIENT                            | CLIENT_APPROVED    |
    /// | StartProduction | CLIENT_APPROVED                               | IN_PRODUCTION      |
    /// | Close           | any but CLOSED                                | CLOSED             |
    pub fn sources(self) -> &'static [ProjectStatus] {
        match self {
            ProjectAction::Submit => &[ProjectStatus::Draft],
            ProjectAction::Resubmit => &[ProjectStatus::NeedsRpmUpdate, ProjectStatus::Draft],
            ProjectAction::Approve | ProjectAction::RequestChanges => REVIEWABLE,
            ProjectAction::GenerateSow => &[ProjectStatus::ApprovedForSow],
            ProjectAction::SendSow => &[ProjectStatus::SowDraft],
            ProjectAction::ClientApprove => &[ProjectStatus::SowSentToClient],
            ProjectAction::StartProduction => &[ProjectStatus::ClientApproved],
            ProjectAction::Close => NOT_CLOSED,
        }
    }

    pub fn target(self) -> ProjectStatus {
        match self {
            ProjectAction::Submit => ProjectStatus::Submitted,
            ProjectAction::Resubmit => ProjectStatus::Draft,
            ProjectAction::Approve => ProjectStatus::ApprovedForSow,
            ProjectAction::RequestChanges => ProjectStatus::NeedsRpmUpdate,
            ProjectAction::GenerateSow => ProjectStatus::SowDraft,
            ProjectAction::SendSow => ProjectStatus::SowSentToClient,
            ProjectAction::ClientApprove => ProjectStatus::ClientApproved,
            ProjectAction::StartProduction => ProjectStatus::InProduction,
            ProjectAction::Close => ProjectStatus::Closed,
        }
    }

    /// Actions accepted by the generic "advance" endpoint.
    pub fn is_manual_advance(self) -> bool {
        matches!(
            self,
            ProjectAction::ClientApprove | ProjectAction::StartProduction | ProjectAction::Close
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectAction::Submit => "SUBMIT",
            ProjectAction::Resubmit => "RESUBMIT",
            ProjectAction::Approve => "APPROVE",
            ProjectAction::RequestChanges => "REQUEST_CHANGES",
            ProjectAction::GenerateSow => "GENERATE_SOW",
            ProjectAction::SendSow => "SEND_SOW",
            ProjectAction::ClientApprove => "CLIENT_APPROVE",
            ProjectAction::StartProduction => "START_PRODUCTION",
            ProjectAction::Close => "CLOSE",
        }
    }
}

/// Check `action` against the transition table and return the new status.
///
/// Rejections are [`CoreError::Conflict`]: the request is well formed but the
/// project is in the wrong state for it.
pub fn validate_transition(
    current: ProjectStatus,
    action: ProjectAction,
) -> Result<ProjectStatus, CoreError> {
    if action.sources().contains(&current) {
        Ok(action.target())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot {} a project in status {current}",
            action.as_str().to_lowercase().replace('_', " ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const ALL_ACTIONS: [ProjectAction; 9] = [
        ProjectAction::Submit,
        ProjectAction::Resubmit,
        ProjectAction::Approve,
        ProjectAction::RequestChanges,
        ProjectAction::GenerateSow,
        ProjectAction::SendSow,
        ProjectAction::ClientApprove,
        ProjectAction::StartProduction,
        ProjectAction::Close,
    ];

    #[test]
    fn status_round_trips_through_str() {
        for s in ProjectStatus::ALL {
            assert_eq!(s.as_str().parse::<ProjectStatus>().unwrap(), s);
        }
        assert!("PENDING".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn review_from_submitted_reaches_only_review_targets() {
        let reachable: Vec<_> = ALL_ACTIONS
            .iter()
            .filter(|a| matches!(a, ProjectAction::Approve | ProjectAction::RequestChanges))
            .filter_map(|a| validate_transition(ProjectStatus::Submitted, *a).ok())
            .collect();
        assert_eq!(
            reachable,
            vec![ProjectStatus::ApprovedForSow, ProjectStatus::NeedsRpmUpdate]
        );
    }

    #[test]
    fn closed_is_terminal() {
        assert!(ProjectStatus::Closed.is_terminal());
        for action in ALL_ACTIONS {
            assert_matches!(
                validate_transition(ProjectStatus::Closed, action),
                Err(CoreError::Conflict(_))
            );
        }
    }

    #[test]
    fn resubmit_returns_to_draft() {
        assert_eq!(
            validate_transition(ProjectStatus::NeedsRpmUpdate, ProjectAction::Resubmit).unwrap(),
            ProjectStatus::Draft
        );
        assert!(validate_transition(ProjectStatus::Submitted, ProjectAction::Resubmit).is_err());
    }

    #[test]
    fn draft_can_be_submitted() {
        assert_eq!(
            validate_transition(ProjectStatus::Draft, ProjectAction::Submit).unwrap(),
            ProjectStatus::Submitted
        );
    }

    #[test]
    fn sow_generation_requires_approval() {
        assert!(validate_transition(ProjectStatus::Submitted, ProjectAction::GenerateSow).is_err());
        assert!(validate_transition(ProjectStatus::SowDraft, ProjectAction::GenerateSow).is_err());
        assert_eq!(
            validate_transition(ProjectStatus::ApprovedForSow, ProjectAction::GenerateSow).unwrap(),
            ProjectStatus::SowDraft
        );
    }

    #[test]
    fn production_path_is_linear() {
        let path = [
            (ProjectStatus::SowDraft, ProjectAction::SendSow),
            (ProjectStatus::SowSentToClient, ProjectAction::ClientApprove),
            (ProjectStatus::ClientApproved, ProjectAction::StartProduction),
            (ProjectStatus::InProduction, ProjectAction::Close),
        ];
        for (from, action) in path {
            assert!(validate_transition(from, action).is_ok(), "{from} {action:?}");
        }
        assert!(validate_transition(ProjectStatus::SowDraft, ProjectAction::StartProduction).is_err());
    }

    #[test]
    fn every_open_status_can_close() {
        for s in ProjectStatus::ALL.into_iter().filter(|s| !s.is_terminal()) {
            assert_eq!(
                validate_transition(s, ProjectAction::Close).unwrap(),
                ProjectStatus::Closed
            );
        }
    }

    #[test]
    fn manual_advance_actions() {
        let manual: Vec<_> = ALL_ACTIONS.into_iter().filter(|a| a.is_manual_advance()).collect();
        assert_eq!(
            manual,
            vec![
                ProjectAction::ClientApprove,
                ProjectAction::StartProduction,
                ProjectAction::Close
            ]
        );
    }

    #[test]
    fn rejection_message_names_status() {
        let err = validate_transition(ProjectStatus::Draft, ProjectAction::Approve).unwrap_err();
        assert!(err.to_string().contains("DRAFT"));
        assert!(err.to_string().contains("approve"));
    }
}
