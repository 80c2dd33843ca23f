//! Read-only pipeline views: the commission dashboard and the admin overview.

use intake_core::commission::{summarize, CommissionLine, CommissionSummary};
use intake_core::lifecycle::ProjectStatus;
use intake_db::models::dashboard::StatusCount;
use intake_db::models::project::{ProjectFilter, ProjectSummary};
use intake_db::repositories::ProjectRepo;
use serde::Serialize;

use crate::actor::Actor;
use crate::error::LifecycleResult;
use crate::projects::ProjectLifecycle;

#[derive(Debug, Clone, Serialize)]
pub struct CommissionDashboard {
    pub summary: CommissionSummary,
    pub lines: Vec<CommissionLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    /// Awaiting a review decision.
    pub pending_review: Vec<ProjectSummary>,
    /// SOW generated but not yet sent.
    pub sow_drafts: Vec<ProjectSummary>,
    /// From approval through production.
    pub active: Vec<ProjectSummary>,
    pub by_status: Vec<StatusCount>,
}

impl ProjectLifecycle {
    /// Commission lines for every project the actor can see.
    pub async fn commission_dashboard(&self, actor: &Actor) -> LifecycleResult<CommissionDashboard> {
        let rows = self.list_scoped(actor, &ProjectFilter::default()).await?;
        let answers = self.answers_by_project(&rows).await?;

        let lines: Vec<CommissionLine> = rows
            .into_iter()
            .map(|row| {
                let p = row.project;
                let stored: Vec<_> = answers
                    .get(&p.id)
                    .map(|list| list.iter().map(|a| a.as_stored()).collect())
                    .unwrap_or_default();
                CommissionLine::new(p.id, p.name, p.status, p.is_paid, p.commission_paid, &stored)
            })
            .collect();

        Ok(CommissionDashboard {
            summary: summarize(&lines),
            lines,
        })
    }

    pub async fn admin_dashboard(&self) -> LifecycleResult<AdminDashboard> {
        let all = ProjectRepo::list(&self.pool, &ProjectFilter::default()).await?;
        let by_status = ProjectRepo::count_by_status(&self.pool).await?;

        let pick = |pred: &dyn Fn(ProjectStatus) -> bool| -> Vec<ProjectSummary> {
            all.iter().filter(|s| pred(s.project.status)).cloned().collect()
        };

        Ok(AdminDashboard {
            pending_review: pick(&|s| s == ProjectStatus::Submitted),
            sow_drafts: pick(&|s| s == ProjectStatus::SowDraft),
            active: pick(&|s| ProjectStatus::ACTIVE.contains(&s)),
            by_status,
        })
    }
}
