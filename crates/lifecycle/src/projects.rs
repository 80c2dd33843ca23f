//! Project Lifecycle Manager.
//!
//! Each operation locks the project row, checks the transition table, and
//! writes the new status conditionally on the status it read. Events are
//! published after commit; their delivery never affects the outcome.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use intake_core::answers::{resolve_answers, validate_required, DroppedAnswer, Resolution};
use intake_core::commission::{commission_on, effective_commission};
use intake_core::lifecycle::{validate_transition, ProjectAction, ProjectStatus};
use intake_core::review::{normalize_comments, ReviewDecision};
use intake_core::sow::{render_sow, SowFields};
use intake_core::types::DbId;
use intake_db::models::answer::{AnswerWithQuestion, DisplayAnswer};
use intake_db::models::client::Client;
use intake_db::models::project::{NewProject, Project, ProjectFilter, ProjectSummary};
use intake_db::models::review::AdminReview;
use intake_db::models::sow::Sow;
use intake_db::repositories::{
    AnswerRepo, ClientRepo, ProjectRepo, QuestionRepo, ReviewRepo, SowRepo,
};
use intake_events::{event_types, EventBus, PlatformEvent};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::{PgConnection, PgPool};

use crate::actor::Actor;
use crate::entities::{BootstrapConfig, EntityResolver};
use crate::error::{LifecycleError, LifecycleResult};
use crate::schema;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A new intake from a producer.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitProject {
    /// Falls back to the project-name answer when absent.
    pub name: Option<String>,
    pub category_id: DbId,
    #[serde(default)]
    pub answers: Map<String, Value>,
}

/// Edited answers for a project sent back for changes.
#[derive(Debug, Clone, Deserialize)]
pub struct ResubmitProject {
    pub name: Option<String>,
    #[serde(default)]
    pub answers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewProject {
    pub decision: ReviewDecision,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendSow {
    pub recipient_email: String,
    /// Replaces the generated body when the admin edited it.
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvanceProject {
    pub action: ProjectAction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkPaid {
    pub final_revenue: f64,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Everything a reviewer or producer sees on the project page.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub summary: ProjectSummary,
    pub client: Client,
    pub answers: Vec<DisplayAnswer>,
    /// Newest first.
    pub reviews: Vec<AdminReview>,
    /// Latest change request while the project awaits the producer.
    pub pending_feedback: Option<AdminReview>,
    pub sows: Vec<Sow>,
    pub commission: f64,
}

/// A listing row with its effective commission.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectListItem {
    #[serde(flatten)]
    pub summary: ProjectSummary,
    pub commission: f64,
}

// ---------------------------------------------------------------------------
// ProjectLifecycle
// ---------------------------------------------------------------------------

pub struct ProjectLifecycle {
    pub(crate) pool: PgPool,
    bus: Arc<EventBus>,
    bootstrap: BootstrapConfig,
}

impl ProjectLifecycle {
    pub fn new(pool: PgPool, bus: Arc<EventBus>, bootstrap: BootstrapConfig) -> Self {
        Self {
            pool,
            bus,
            bootstrap,
        }
    }

    fn resolver(&self) -> EntityResolver<'_> {
        EntityResolver::new(&self.bootstrap)
    }

    /// Create a project in SUBMITTED from a raw answer map.
    pub async fn submit_project(
        &self,
        actor: &Actor,
        input: &SubmitProject,
    ) -> LifecycleResult<Project> {
        let mut tx = self.pool.begin().await?;

        let schema = schema::load_active(&mut tx, input.category_id).await?;
        let mut resolution = resolve_answers(&input.answers, &schema);
        verify_orphans(&mut tx, input.category_id, &mut resolution).await?;
        validate_required(&schema, &resolution)?;

        let name = non_blank(input.name.as_deref())
            .or(resolution.project_name.clone())
            .ok_or_else(|| LifecycleError::validation("Project name is required"))?;

        let resolver = self.resolver();
        let admin = resolver.resolve_admin(&mut tx).await?;
        let client = resolver
            .resolve_client(&mut tx, resolution.client_name.as_deref())
            .await?;

        let project = ProjectRepo::create(
            &mut *tx,
            &NewProject {
                name,
                category_id: input.category_id,
                client_id: client.id,
                created_by: admin.id,
                submitted_by: Some(actor.user_id),
                status: ProjectStatus::Submitted,
            },
        )
        .await?;
        AnswerRepo::insert_many(&mut tx, project.id, &resolution.answers).await?;

        tx.commit().await?;

        log_dropped(project.id, &resolution.dropped);
        tracing::info!(
            project_id = %project.id,
            client_id = %client.id,
            user_id = %actor.user_id,
            answer_count = resolution.answers.len(),
            "Project submitted",
        );

        self.publish(
            project_event(event_types::PROJECT_SUBMITTED, &project, actor).with_payload(payload(
                &project,
                json!({ "admin_id": admin.id, "client_name": client.company_name }),
            )),
        );

        Ok(project)
    }

    /// Replace a project's answers and return it to DRAFT.
    pub async fn resubmit_project(
        &self,
        actor: &Actor,
        id: DbId,
        input: &ResubmitProject,
    ) -> LifecycleResult<Project> {
        let mut tx = self.pool.begin().await?;

        let project = lock_accessible(&mut tx, actor, id).await?;
        let next = validate_transition(project.status, ProjectAction::Resubmit)?;

        let schema = schema::load_active(&mut tx, project.category_id).await?;
        let mut resolution = resolve_answers(&input.answers, &schema);
        verify_orphans(&mut tx, project.category_id, &mut resolution).await?;
        validate_required(&schema, &resolution)?;

        let name = non_blank(input.name.as_deref()).or(resolution.project_name.clone());
        if let Some(name) = name.filter(|n| *n != project.name) {
            ProjectRepo::update_name(&mut *tx, id, &name).await?;
        }

        AnswerRepo::replace_all(&mut tx, id, &resolution.answers).await?;
        let updated = transition(&mut tx, &project, next).await?;
        let admin = self.resolver().resolve_admin(&mut tx).await?;

        tx.commit().await?;

        log_dropped(id, &resolution.dropped);
        tracing::info!(project_id = %id, user_id = %actor.user_id, "Project resubmitted");

        self.publish(
            project_event(event_types::PROJECT_RESUBMITTED, &updated, actor)
                .with_payload(payload(&updated, json!({ "admin_id": admin.id }))),
        );

        Ok(updated)
    }

    /// Send a DRAFT project to review.
    pub async fn submit_draft(&self, actor: &Actor, id: DbId) -> LifecycleResult<Project> {
        let mut tx = self.pool.begin().await?;

        let project = lock_accessible(&mut tx, actor, id).await?;
        let next = validate_transition(project.status, ProjectAction::Submit)?;
        let updated = transition(&mut tx, &project, next).await?;
        let admin = self.resolver().resolve_admin(&mut tx).await?;

        tx.commit().await?;

        tracing::info!(project_id = %id, user_id = %actor.user_id, "Draft submitted for review");

        self.publish(
            project_event(event_types::PROJECT_SUBMITTED, &updated, actor)
                .with_payload(payload(&updated, json!({ "admin_id": admin.id }))),
        );

        Ok(updated)
    }

    /// Record an admin decision and move the project accordingly.
    pub async fn review_project(
        &self,
        actor: &Actor,
        id: DbId,
        input: &ReviewProject,
    ) -> LifecycleResult<AdminReview> {
        require_admin(actor)?;
        let comments = normalize_comments(input.decision, input.comments.as_deref())?;

        let mut tx = self.pool.begin().await?;

        let project = lock(&mut tx, id).await?;
        let next = validate_transition(project.status, input.decision.action())?;
        let reviewer = self.resolver().resolve_reviewer(&mut tx, actor.user_id).await?;
        let review =
            ReviewRepo::create(&mut *tx, id, reviewer.id, input.decision, &comments).await?;
        let updated = transition(&mut tx, &project, next).await?;

        tx.commit().await?;

        tracing::info!(
            project_id = %id,
            reviewer_id = %reviewer.id,
            decision = %input.decision,
            "Project reviewed",
        );

        let event_type = match input.decision {
            ReviewDecision::Approved => event_types::REVIEW_APPROVED,
            ReviewDecision::ChangesRequested => event_types::REVIEW_CHANGES_REQUESTED,
        };
        self.publish(project_event(event_type, &updated, actor).with_payload(payload(
            &updated,
            json!({ "decision": input.decision, "comments": comments, "review_id": review.id }),
        )));

        Ok(review)
    }

    /// Render a SOW from the stored answers and move to SOW_DRAFT.
    ///
    /// The conditional status write rejects a second generation for the
    /// same project.
    pub async fn generate_sow(&self, actor: &Actor, id: DbId) -> LifecycleResult<Sow> {
        require_admin(actor)?;

        let mut tx = self.pool.begin().await?;

        let project = lock(&mut tx, id).await?;
        let next = validate_transition(project.status, ProjectAction::GenerateSow)?;

        let answers = AnswerRepo::list_for_project(&mut *tx, id).await?;
        let stored: Vec<_> = answers.iter().map(AnswerWithQuestion::as_stored).collect();
        let client = ClientRepo::find_by_id(&mut *tx, project.client_id).await?;
        let body = render_sow(
            &project.name,
            client.as_ref().map(|c| c.company_name.as_str()),
            Utc::now().date_naive(),
            &SowFields::from_answers(&stored),
        );

        let author = self.resolver().resolve_reviewer(&mut tx, actor.user_id).await?;
        let sow = SowRepo::create_next_version(&mut *tx, id, &body, author.id).await?;
        let updated = transition(&mut tx, &project, next).await?;

        tx.commit().await?;

        tracing::info!(project_id = %id, sow_id = %sow.id, version = sow.version_number, "SOW generated");

        self.publish(project_event(event_types::SOW_GENERATED, &updated, actor).with_payload(
            payload(&updated, json!({ "sow_id": sow.id, "version": sow.version_number })),
        ));

        Ok(sow)
    }

    /// Publish the latest SOW to the client and move to SOW_SENT_TO_CLIENT.
    pub async fn send_sow(&self, actor: &Actor, id: DbId, input: &SendSow) -> LifecycleResult<Sow> {
        require_admin(actor)?;
        let recipient = input.recipient_email.trim();
        if recipient.is_empty() || !recipient.contains('@') {
            return Err(LifecycleError::validation("A valid recipient email is required"));
        }
        let body_override = non_blank(input.body.as_deref());

        let mut tx = self.pool.begin().await?;

        let project = lock(&mut tx, id).await?;
        let next = validate_transition(project.status, ProjectAction::SendSow)?;
        let latest = SowRepo::latest_for_project(&mut *tx, id)
            .await?
            .ok_or_else(|| LifecycleError::conflict("No SOW has been generated for this project"))?;
        let sow = SowRepo::publish(&mut *tx, latest.id, recipient, body_override.as_deref())
            .await?
            .ok_or_else(|| LifecycleError::not_found("Sow", latest.id))?;
        let updated = transition(&mut tx, &project, next).await?;

        tx.commit().await?;

        tracing::info!(project_id = %id, sow_id = %sow.id, recipient = %recipient, "SOW sent");

        self.publish(project_event(event_types::SOW_SENT, &updated, actor).with_payload(payload(
            &updated,
            json!({ "sow_id": sow.id, "recipient_email": recipient, "body": sow.body }),
        )));

        Ok(sow)
    }

    /// Apply one of the manual status actions (client approval, production
    /// start, close).
    pub async fn advance(
        &self,
        actor: &Actor,
        id: DbId,
        action: ProjectAction,
    ) -> LifecycleResult<Project> {
        require_admin(actor)?;
        if !action.is_manual_advance() {
            return Err(LifecycleError::validation(format!(
                "Action {} cannot be applied directly",
                action.as_str()
            )));
        }

        let mut tx = self.pool.begin().await?;

        let project = lock(&mut tx, id).await?;
        let next = validate_transition(project.status, action)?;
        let updated = transition(&mut tx, &project, next).await?;

        tx.commit().await?;

        tracing::info!(
            project_id = %id,
            from = %project.status,
            to = %updated.status,
            "Project status changed",
        );

        self.publish(
            project_event(event_types::PROJECT_STATUS_CHANGED, &updated, actor).with_payload(
                payload(&updated, json!({ "from": project.status, "to": updated.status })),
            ),
        );

        Ok(updated)
    }

    /// Record the final revenue and the commission owed on it. Status is
    /// left untouched.
    pub async fn mark_paid(
        &self,
        actor: &Actor,
        id: DbId,
        final_revenue: f64,
    ) -> LifecycleResult<Project> {
        require_admin(actor)?;
        if !final_revenue.is_finite() || final_revenue <= 0.0 {
            return Err(LifecycleError::validation(
                "Final revenue must be a positive amount",
            ));
        }
        let commission = commission_on(final_revenue);

        let Some(project) = ProjectRepo::mark_paid(&self.pool, id, final_revenue, commission).await?
        else {
            return match ProjectRepo::find_by_id(&self.pool, id).await? {
                Some(_) => Err(LifecycleError::conflict("Project is already marked as paid")),
                None => Err(LifecycleError::not_found("Project", id)),
            };
        };

        tracing::info!(project_id = %id, final_revenue, commission, "Project marked paid");

        self.publish(project_event(event_types::PROJECT_PAID, &project, actor).with_payload(
            payload(
                &project,
                json!({ "final_revenue": final_revenue, "commission_paid": commission }),
            ),
        ));

        Ok(project)
    }

    /// Hard-delete a project. Answers, reviews and SOWs go with it.
    pub async fn delete_project(&self, actor: &Actor, id: DbId) -> LifecycleResult<()> {
        let mut tx = self.pool.begin().await?;

        let project = lock_accessible(&mut tx, actor, id).await?;
        ProjectRepo::hard_delete(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!(project_id = %id, user_id = %actor.user_id, "Project deleted");

        self.publish(
            project_event(event_types::PROJECT_DELETED, &project, actor)
                .with_payload(payload(&project, json!({}))),
        );

        Ok(())
    }

    pub async fn get_project(&self, actor: &Actor, id: DbId) -> LifecycleResult<ProjectDetail> {
        let summary = ProjectRepo::find_summary(&self.pool, id)
            .await?
            .filter(|s| actor.can_access(&s.project))
            .ok_or_else(|| LifecycleError::not_found("Project", id))?;

        let client = ClientRepo::find_by_id(&self.pool, summary.project.client_id)
            .await?
            .ok_or_else(|| LifecycleError::not_found("Client", summary.project.client_id))?;
        let answers = AnswerRepo::list_for_project(&self.pool, id).await?;
        let reviews = ReviewRepo::list_for_project(&self.pool, id).await?;
        let sows = SowRepo::list_for_project(&self.pool, id).await?;

        let stored: Vec<_> = answers.iter().map(AnswerWithQuestion::as_stored).collect();
        let commission = effective_commission(
            summary.project.is_paid,
            summary.project.commission_paid,
            &stored,
        );
        let pending_feedback = pending_feedback(summary.project.status, &reviews);

        Ok(ProjectDetail {
            client,
            answers: answers.iter().map(AnswerWithQuestion::to_display).collect(),
            pending_feedback,
            reviews,
            sows,
            commission,
            summary,
        })
    }

    /// Projects matching `filter`. Producers only see their own.
    pub async fn list_projects(
        &self,
        actor: &Actor,
        filter: &ProjectFilter,
    ) -> LifecycleResult<Vec<ProjectListItem>> {
        let rows = self.list_scoped(actor, filter).await?;
        let answers = self.answers_by_project(&rows).await?;

        Ok(rows
            .into_iter()
            .map(|summary| {
                let stored: Vec<_> = answers
                    .get(&summary.project.id)
                    .map(|list| list.iter().map(|a| a.as_stored()).collect())
                    .unwrap_or_default();
                let commission = effective_commission(
                    summary.project.is_paid,
                    summary.project.commission_paid,
                    &stored,
                );
                ProjectListItem {
                    summary,
                    commission,
                }
            })
            .collect())
    }

    pub(crate) async fn list_scoped(
        &self,
        actor: &Actor,
        filter: &ProjectFilter,
    ) -> LifecycleResult<Vec<ProjectSummary>> {
        let mut filter = filter.clone();
        if !actor.is_admin() {
            filter.submitted_by = Some(actor.user_id);
        }
        Ok(ProjectRepo::list(&self.pool, &filter).await?)
    }

    /// Answers of `rows`, grouped by project id.
    pub(crate) async fn answers_by_project(
        &self,
        rows: &[ProjectSummary],
    ) -> LifecycleResult<HashMap<DbId, Vec<AnswerWithQuestion>>> {
        let ids: Vec<DbId> = rows.iter().map(|r| r.project.id).collect();
        let mut grouped: HashMap<DbId, Vec<AnswerWithQuestion>> = HashMap::new();
        for answer in AnswerRepo::list_for_projects(&self.pool, &ids).await? {
            grouped.entry(answer.project_id).or_default().push(answer);
        }
        Ok(grouped)
    }

    fn publish(&self, event: PlatformEvent) {
        self.bus.publish(event);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_admin(actor: &Actor) -> LifecycleResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(LifecycleError::forbidden("Admin role required"))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

async fn lock(conn: &mut PgConnection, id: DbId) -> LifecycleResult<Project> {
    ProjectRepo::find_for_update(conn, id)
        .await?
        .ok_or_else(|| LifecycleError::not_found("Project", id))
}

/// Lock a project the actor may act on. Projects of other producers are
/// reported as missing.
async fn lock_accessible(conn: &mut PgConnection, actor: &Actor, id: DbId) -> LifecycleResult<Project> {
    let project = lock(conn, id).await?;
    if actor.can_access(&project) {
        Ok(project)
    } else {
        Err(LifecycleError::not_found("Project", id))
    }
}

async fn transition(
    conn: &mut PgConnection,
    project: &Project,
    next: ProjectStatus,
) -> LifecycleResult<Project> {
    ProjectRepo::transition(conn, project.id, project.status, next)
        .await?
        .ok_or_else(|| {
            LifecycleError::conflict(format!(
                "Project {} is no longer in status {}",
                project.id, project.status
            ))
        })
}

/// Keep well-shaped orphan answers whose question belongs to one of the
/// category's question sets.
async fn verify_orphans(
    conn: &mut PgConnection,
    category_id: DbId,
    resolution: &mut Resolution,
) -> LifecycleResult<()> {
    if resolution.unverified.is_empty() {
        return Ok(());
    }
    let ids: Vec<_> = resolution
        .unverified
        .iter()
        .map(|a| a.question_id.clone())
        .collect();
    let existing: HashSet<_> = QuestionRepo::existing_ids(conn, category_id, &ids)
        .await?
        .into_iter()
        .collect();
    resolution.verify(&existing);
    Ok(())
}

fn log_dropped(project_id: DbId, dropped: &[DroppedAnswer]) {
    for d in dropped {
        tracing::warn!(
            project_id = %project_id,
            key = %d.key,
            reason = ?d.reason,
            "Answer dropped: no matching question",
        );
    }
}

fn pending_feedback(status: ProjectStatus, reviews: &[AdminReview]) -> Option<AdminReview> {
    if status != ProjectStatus::NeedsRpmUpdate {
        return None;
    }
    reviews
        .iter()
        .find(|r| r.decision == ReviewDecision::ChangesRequested)
        .cloned()
}

fn project_event(event_type: &str, project: &Project, actor: &Actor) -> PlatformEvent {
    PlatformEvent::for_project(event_type, project.id).with_actor(actor.user_id)
}

/// Common project fields merged with event-specific `extra` fields.
fn payload(project: &Project, extra: Value) -> Value {
    let mut map = Map::new();
    map.insert("project_name".into(), json!(project.name));
    map.insert("status".into(), json!(project.status));
    map.insert("created_by".into(), json!(project.created_by));
    map.insert("submitted_by".into(), json!(project.submitted_by));
    if let Value::Object(extra) = extra {
        map.extend(extra);
    }
    Value::Object(map)
}
