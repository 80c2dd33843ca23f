//! External delivery channels.
//!
//! Used by the notification router to push events outside the platform.
//! Every channel is best-effort: callers log failures and move on.

pub mod email;
pub mod webhook;
