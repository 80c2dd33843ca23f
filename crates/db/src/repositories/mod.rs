//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Single-statement methods take any `PgExecutor` (`&PgPool` or `&mut *tx`);
//! multi-statement methods take `&mut PgConnection` and expect the caller
//! to own the transaction.

pub mod answer_repo;
pub mod category_repo;
pub mod client_repo;
pub mod event_repo;
pub mod notification_repo;
pub mod project_repo;
pub mod question_repo;
pub mod question_set_repo;
pub mod review_repo;
pub mod sow_repo;
pub mod user_repo;

pub use answer_repo::AnswerRepo;
pub use category_repo::CategoryRepo;
pub use client_repo::ClientRepo;
pub use event_repo::EventRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
pub use question_repo::QuestionRepo;
pub use question_set_repo::QuestionSetRepo;
pub use review_repo::ReviewRepo;
pub use sow_repo::SowRepo;
pub use user_repo::UserRepo;
