//! Project entity model, list rows and filters.

use intake_core::lifecycle::ProjectStatus;
use intake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub client_id: DbId,
    pub created_by: DbId,
    pub submitted_by: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub final_revenue: Option<f64>,
    pub commission_paid: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project joined with its category and client names, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub category_name: String,
    pub client_name: String,
}

/// Insert payload for a new project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub category_id: DbId,
    pub client_id: DbId,
    pub created_by: DbId,
    pub submitted_by: Option<DbId>,
    pub status: ProjectStatus,
}

/// Query filters for listing projects. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub category_id: Option<DbId>,
    pub client_id: Option<DbId>,
    pub is_paid: Option<bool>,
    pub submitted_by: Option<DbId>,
}
