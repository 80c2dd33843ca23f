//! Handlers for the `/projects` resource.
//!
//! Visibility and role checks live in [`ProjectLifecycle`]; admin-only routes
//! additionally reject non-admins up front via [`RequireAdmin`].
//!
//! [`ProjectLifecycle`]: intake_lifecycle::ProjectLifecycle

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use intake_core::types::DbId;
use intake_db::models::project::{Project, ProjectFilter};
use intake_db::models::review::AdminReview;
use intake_db::models::sow::Sow;
use intake_lifecycle::projects::{
    AdvanceProject, MarkPaid, ProjectDetail, ProjectListItem, ResubmitProject, ReviewProject,
    SendSow, SubmitProject,
};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<ProjectListItem>>>> {
    let projects = state.lifecycle.list_projects(&auth.actor(), &filter).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = state.lifecycle.submit_project(&auth.actor(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let detail = state.lifecycle.get_project(&auth.actor(), id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/projects/{id}
///
/// Replaces the answers and returns the project to DRAFT.
pub async fn resubmit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ResubmitProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .lifecycle
        .resubmit_project(&auth.actor(), id, &input)
        .await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.lifecycle.delete_project(&auth.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/submit
pub async fn submit_draft(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.lifecycle.submit_draft(&auth.actor(), id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/review
pub async fn review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewProject>,
) -> AppResult<(StatusCode, Json<DataResponse<AdminReview>>)> {
    let review = state
        .lifecycle
        .review_project(&admin.actor(), id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// POST /api/v1/projects/{id}/sow
pub async fn generate_sow(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Sow>>)> {
    let sow = state.lifecycle.generate_sow(&admin.actor(), id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: sow })))
}

/// POST /api/v1/projects/{id}/sow/send
pub async fn send_sow(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SendSow>,
) -> AppResult<Json<DataResponse<Sow>>> {
    let sow = state.lifecycle.send_sow(&admin.actor(), id, &input).await?;
    Ok(Json(DataResponse { data: sow }))
}

/// POST /api/v1/projects/{id}/advance
pub async fn advance(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdvanceProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .lifecycle
        .advance(&admin.actor(), id, input.action)
        .await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/mark-paid
pub async fn mark_paid(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MarkPaid>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .lifecycle
        .mark_paid(&admin.actor(), id, input.final_revenue)
        .await?;
    Ok(Json(DataResponse { data: project }))
}
