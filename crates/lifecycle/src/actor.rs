//! The caller on whose behalf an operation runs.

use intake_core::roles;
use intake_core::types::DbId;
use intake_db::models::project::Project;

/// Identity supplied by the session provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: String,
}

impl Actor {
    pub fn new(user_id: DbId, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        roles::is_admin(&self.role)
    }

    /// Admins see everything; producers see the projects they submitted.
    pub fn can_access(&self, project: &Project) -> bool {
        self.is_admin() || project.submitted_by == Some(self.user_id)
    }
}
