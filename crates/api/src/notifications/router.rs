//! Event-to-notification routing engine.
//!
//! Every failure here is logged and swallowed: a notification that cannot be
//! written never affects the operation that raised the event.

use intake_core::types::DbId;
use intake_db::models::notification::NewNotification;
use intake_db::repositories::NotificationRepo;
use intake_db::DbPool;
use intake_events::{event_types, EmailDelivery, OutboundEmail, PlatformEvent, WebhookDelivery};
use serde_json::json;
use tokio::sync::broadcast;

/// Notification kinds stored in `notifications.kind`.
pub mod kinds {
    pub const PROJECT_SUBMITTED: &str = "PROJECT_SUBMITTED";
    pub const PROJECT_RESUBMITTED: &str = "PROJECT_RESUBMITTED";
    pub const PROJECT_APPROVED: &str = "PROJECT_APPROVED";
    pub const CHANGES_REQUESTED: &str = "CHANGES_REQUESTED";
    pub const SOW_SENT: &str = "SOW_SENT";
    pub const PROJECT_PAID: &str = "PROJECT_PAID";
}

/// A notification derived from an event, before it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
    pub user_id: DbId,
    pub kind: &'static str,
    pub title: String,
    pub message: String,
}

/// Decide who hears about `event` and what they are told.
///
/// Returns `None` for events nobody is notified about, or when the target
/// user is not recorded on the event.
pub fn compose(event: &PlatformEvent) -> Option<Composed> {
    let name = event.payload_str("project_name").unwrap_or("Untitled Project");

    let (target, kind, title, message) = match event.event_type.as_str() {
        event_types::PROJECT_SUBMITTED => (
            "admin_id",
            kinds::PROJECT_SUBMITTED,
            "New Project Received",
            format!("Project \"{name}\" has been submitted."),
        ),
        event_types::PROJECT_RESUBMITTED => (
            "admin_id",
            kinds::PROJECT_RESUBMITTED,
            "Project Updated",
            format!("Project \"{name}\" has been updated after review."),
        ),
        event_types::REVIEW_APPROVED => (
            "submitted_by",
            kinds::PROJECT_APPROVED,
            "Project Approved",
            format!("Project \"{name}\" has been approved for a statement of work."),
        ),
        event_types::REVIEW_CHANGES_REQUESTED => {
            let message = match event.payload_str("comments").filter(|c| !c.trim().is_empty()) {
                Some(comments) => format!("Changes requested on \"{name}\": {comments}"),
                None => format!("Changes requested on \"{name}\"."),
            };
            (
                "submitted_by",
                kinds::CHANGES_REQUESTED,
                "Changes Requested",
                message,
            )
        }
        event_types::SOW_SENT => (
            "submitted_by",
            kinds::SOW_SENT,
            "SOW Sent",
            format!("The statement of work for \"{name}\" was sent to the client."),
        ),
        event_types::PROJECT_PAID => (
            "submitted_by",
            kinds::PROJECT_PAID,
            "Project Paid",
            format!("Project \"{name}\" has been marked as paid."),
        ),
        _ => return None,
    };

    Some(Composed {
        user_id: event.payload_id(target)?,
        kind,
        title: title.to_string(),
        message,
    })
}

/// Routes platform events to user notifications and outbound channels.
pub struct NotificationRouter {
    pool: DbPool,
    email: Option<EmailDelivery>,
    webhook: Option<WebhookDelivery>,
}

impl NotificationRouter {
    /// Create a router. Absent channels are skipped.
    pub fn new(
        pool: DbPool,
        email: Option<EmailDelivery>,
        webhook: Option<WebhookDelivery>,
    ) -> Self {
        Self {
            pool,
            email,
            webhook,
        }
    }

    /// Run the main routing loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](intake_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.route_event(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Handle a single event: in-app notification first, then any external
    /// delivery the event calls for.
    pub async fn route_event(&self, event: &PlatformEvent) {
        if let Some(composed) = compose(event) {
            let metadata = json!({ "project_id": event.source_entity_id });
            self.notify(
                composed.user_id,
                composed.kind,
                &composed.title,
                &composed.message,
                metadata,
            )
            .await;
        }

        if event.event_type == event_types::SOW_SENT {
            self.deliver_sow(event).await;
        }
    }

    /// Write one notification row. Failures are logged.
    pub async fn notify(
        &self,
        user_id: DbId,
        kind: &str,
        title: &str,
        message: &str,
        metadata: serde_json::Value,
    ) {
        let input = NewNotification {
            user_id,
            kind: kind.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            metadata: Some(metadata),
        };
        match NotificationRepo::create(&self.pool, &input).await {
            Ok(n) => tracing::debug!(notification_id = %n.id, %user_id, kind, "Notification created"),
            Err(e) => tracing::error!(error = %e, %user_id, kind, "Failed to create notification"),
        }
    }

    async fn deliver_sow(&self, event: &PlatformEvent) {
        if let Some(email) = &self.email {
            match sow_email(event) {
                Some(outbound) => {
                    if let Err(e) = email.send(&outbound).await {
                        tracing::error!(
                            error = %e,
                            project_id = ?event.source_entity_id,
                            "SOW email delivery failed",
                        );
                    }
                }
                None => tracing::warn!(
                    project_id = ?event.source_entity_id,
                    "sow.sent event without a recipient, email skipped",
                ),
            }
        }

        if let Some(webhook) = &self.webhook {
            if let Err(e) = webhook.deliver(event).await {
                tracing::warn!(
                    error = %e,
                    project_id = ?event.source_entity_id,
                    "Automation webhook delivery failed",
                );
            }
        }
    }
}

fn sow_email(event: &PlatformEvent) -> Option<OutboundEmail> {
    let to = event.payload_str("recipient_email")?;
    let name = event.payload_str("project_name").unwrap_or("Untitled Project");
    let body = event.payload_str("body").unwrap_or_default();
    Some(OutboundEmail::statement_of_work(to, name, body))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn event(event_type: &str, payload: serde_json::Value) -> PlatformEvent {
        PlatformEvent::for_project(event_type, Uuid::new_v4()).with_payload(payload)
    }

    #[test]
    fn submission_notifies_the_admin() {
        let admin = Uuid::new_v4();
        let rpm = Uuid::new_v4();
        let e = event(
            event_types::PROJECT_SUBMITTED,
            json!({ "project_name": "Summer Spot", "admin_id": admin, "submitted_by": rpm }),
        );

        let composed = compose(&e).expect("submission is notified");
        assert_eq!(composed.user_id, admin);
        assert_eq!(composed.kind, kinds::PROJECT_SUBMITTED);
        assert_eq!(composed.title, "New Project Received");
        assert_eq!(composed.message, "Project \"Summer Spot\" has been submitted.");
    }

    #[test]
    fn review_outcomes_notify_the_submitter() {
        let rpm = Uuid::new_v4();
        let e = event(
            event_types::REVIEW_CHANGES_REQUESTED,
            json!({ "project_name": "Gala", "submitted_by": rpm, "comments": "Clarify budget" }),
        );

        let composed = compose(&e).expect("review is notified");
        assert_eq!(composed.user_id, rpm);
        assert_eq!(composed.kind, kinds::CHANGES_REQUESTED);
        assert!(composed.message.ends_with("Clarify budget"));

        let approved = event(
            event_types::REVIEW_APPROVED,
            json!({ "project_name": "Gala", "submitted_by": rpm }),
        );
        assert_eq!(compose(&approved).map(|c| c.kind), Some(kinds::PROJECT_APPROVED));
    }

    #[test]
    fn missing_target_or_unrouted_event_yields_nothing() {
        let no_submitter = event(
            event_types::PROJECT_PAID,
            json!({ "project_name": "Gala", "submitted_by": null }),
        );
        assert!(compose(&no_submitter).is_none());

        let generated = event(
            event_types::SOW_GENERATED,
            json!({ "project_name": "Gala", "submitted_by": Uuid::new_v4() }),
        );
        assert!(compose(&generated).is_none());
    }

    #[test]
    fn sow_email_needs_a_recipient() {
        let with = event(
            event_types::SOW_SENT,
            json!({ "project_name": "Gala", "recipient_email": "client@example.com", "body": "SOW" }),
        );
        assert!(sow_email(&with).is_some());

        let without = event(event_types::SOW_SENT, json!({ "project_name": "Gala" }));
        assert!(sow_email(&without).is_none());
    }
}
