//! Intake event bus and outbound delivery.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`. Lifecycle operations publish and move on.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`EventPersistence`]: background service writing every event to the
//!   `events` audit table.
//! - [`delivery`]: external channels (SMTP email, automation webhook).

pub mod bus;
pub mod delivery;
pub mod persistence;

pub use bus::{event_types, EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, OutboundEmail};
pub use delivery::webhook::{WebhookConfig, WebhookDelivery, WebhookError};
pub use persistence::EventPersistence;
