//! Statement of Work model.

use intake_core::sow::SowStatus;
use intake_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `sows` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sow {
    pub id: DbId,
    pub project_id: DbId,
    pub version_number: i32,
    #[sqlx(try_from = "String")]
    pub status: SowStatus,
    pub body: String,
    pub created_by: DbId,
    pub recipient_email: Option<String>,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
