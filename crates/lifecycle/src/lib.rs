//! Project lifecycle orchestration.
//!
//! Wires the pure rules of `intake-core` to storage and the event bus:
//!
//! - [`QuestionSchemaStore`]: categories and versioned question sets.
//! - [`EntityResolver`]: fallback admin and client records.
//! - [`ProjectLifecycle`]: submission, review, SOW, payment, deletion.
//! - [`dashboard`]: commission and admin pipeline views.
//!
//! Every multi-step write runs in one transaction. Events are published
//! after commit and never awaited.

pub mod actor;
pub mod dashboard;
pub mod entities;
pub mod error;
pub mod projects;
pub mod schema;

pub use actor::Actor;
pub use entities::{BootstrapConfig, EntityResolver};
pub use error::{LifecycleError, LifecycleResult};
pub use projects::ProjectLifecycle;
pub use schema::QuestionSchemaStore;
