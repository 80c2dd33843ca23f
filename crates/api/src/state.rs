use std::sync::Arc;

use intake_lifecycle::{ProjectLifecycle, QuestionSchemaStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: intake_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<intake_events::EventBus>,
    pub lifecycle: Arc<ProjectLifecycle>,
    pub schema: Arc<QuestionSchemaStore>,
}
