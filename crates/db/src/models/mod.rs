//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the `Deserialize` DTOs used to create it.

pub mod answer;
pub mod category;
pub mod client;
pub mod dashboard;
pub mod event;
pub mod notification;
pub mod project;
pub mod question;
pub mod review;
pub mod sow;
pub mod user;
