use intake_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

impl LifecycleError {
    pub fn not_found(entity: &'static str, id: intake_core::types::DbId) -> Self {
        LifecycleError::Core(CoreError::NotFound { entity, id })
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        LifecycleError::Core(CoreError::Conflict(msg.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        LifecycleError::Core(CoreError::Validation(msg.into()))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        LifecycleError::Core(CoreError::Forbidden(msg.into()))
    }
}
