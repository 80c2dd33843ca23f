//! Notification routing.
//!
//! The [`NotificationRouter`] subscribes to the event bus, writes in-app
//! notifications for the affected user and hands SOW deliveries to the
//! email and webhook channels.

pub mod router;

pub use router::NotificationRouter;
