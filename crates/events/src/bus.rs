//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`PlatformEvent`]s, shared
//! via `Arc<EventBus>`. Publishing never blocks and never fails, which keeps
//! the lifecycle's success path independent of notification delivery.

use chrono::{DateTime, Utc};
use intake_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event names published by the lifecycle.
pub mod event_types {
    pub const PROJECT_SUBMITTED: &str = "project.submitted";
    pub const PROJECT_RESUBMITTED: &str = "project.resubmitted";
    pub const PROJECT_STATUS_CHANGED: &str = "project.status_changed";
    pub const PROJECT_PAID: &str = "project.paid";
    pub const PROJECT_DELETED: &str = "project.deleted";
    pub const REVIEW_APPROVED: &str = "review.approved";
    pub const REVIEW_CHANGES_REQUESTED: &str = "review.changes_requested";
    pub const SOW_GENERATED: &str = "sow.generated";
    pub const SOW_SENT: &str = "sow.sent";
}

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the platform.
///
/// Constructed via [`PlatformEvent::new`] and enriched with the builder
/// methods [`with_source`](PlatformEvent::with_source),
/// [`with_actor`](PlatformEvent::with_actor), and
/// [`with_payload`](PlatformEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"project.submitted"`.
    pub event_type: String,

    /// Optional source entity kind (e.g. `"project"`).
    pub source_entity_type: Option<String>,

    pub source_entity_id: Option<DbId>,

    /// Optional id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Shorthand for an event about a project.
    pub fn for_project(event_type: impl Into<String>, project_id: DbId) -> Self {
        Self::new(event_type).with_source("project", project_id)
    }

    /// Attach a source entity to the event.
    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    /// Attach the acting user, if known.
    pub fn with_actor(mut self, user_id: impl Into<Option<DbId>>) -> Self {
        self.actor_user_id = user_id.into();
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// String field of the payload, if present.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }

    /// UUID field of the payload, if present and well formed.
    pub fn payload_id(&self, key: &str) -> Option<DbId> {
        self.payload_str(key).and_then(|s| s.parse().ok())
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use intake_events::bus::{EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new("project.submitted"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: PlatformEvent) {
        tracing::debug!(event_type = %event.event_type, "Publishing event");
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let project_id = DbId::new_v4();
        let actor = DbId::new_v4();

        bus.publish(
            PlatformEvent::for_project(event_types::PROJECT_SUBMITTED, project_id)
                .with_actor(actor)
                .with_payload(serde_json::json!({"project_name": "Spring Launch"})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "project.submitted");
        assert_eq!(received.source_entity_type.as_deref(), Some("project"));
        assert_eq!(received.source_entity_id, Some(project_id));
        assert_eq!(received.actor_user_id, Some(actor));
        assert_eq!(received.payload_str("project_name"), Some("Spring Launch"));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(PlatformEvent::new(event_types::SOW_SENT));

        assert_eq!(rx1.recv().await.unwrap().event_type, "sow.sent");
        assert_eq!(rx2.recv().await.unwrap().event_type, "sow.sent");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new("orphan.event"));
    }

    #[test]
    fn payload_id_parses_uuid() {
        let id = DbId::new_v4();
        let event = PlatformEvent::new("x").with_payload(serde_json::json!({
            "admin_id": id.to_string(),
            "bad": "nope",
        }));
        assert_eq!(event.payload_id("admin_id"), Some(id));
        assert_eq!(event.payload_id("bad"), None);
        assert_eq!(event.payload_id("missing"), None);
    }

    #[test]
    fn actor_is_optional() {
        let event = PlatformEvent::new("x").with_actor(None::<DbId>);
        assert!(event.actor_user_id.is_none());
        assert!(event.payload.is_object());
    }
}
