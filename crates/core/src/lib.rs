//! Domain logic for the project intake and review platform.
//!
//! Everything in this crate is pure: no database, no network. The `db`,
//! `lifecycle` and `api` crates build on these types and rules.

pub mod answers;
pub mod commission;
pub mod error;
pub mod lifecycle;
pub mod question;
pub mod review;
pub mod roles;
pub mod sow;
pub mod types;
