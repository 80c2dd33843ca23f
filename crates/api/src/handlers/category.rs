//! Handlers for categories and their versioned question sets.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use intake_core::question::SchemaQuestion;
use intake_core::types::DbId;
use intake_db::models::category::{Category, CategorySummary, CreateCategory};
use intake_db::models::question::{PublishQuestionSet, QuestionSet, QuestionSetWithQuestions};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategorySummary>>>> {
    let categories = state.schema.list_categories().await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let category = state.schema.create_category(&input.name).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories/{id}/questions
///
/// The intake form for a category: its active questions in order, with the
/// DATE placeholder appended when needed.
pub async fn active_questions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SchemaQuestion>>>> {
    let questions = state.schema.get_active_questions(id).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// GET /api/v1/categories/{id}/question-sets
pub async fn list_question_sets(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<QuestionSet>>>> {
    let sets = state.schema.list_question_sets(id).await?;
    Ok(Json(DataResponse { data: sets }))
}

/// POST /api/v1/categories/{id}/question-sets
pub async fn publish_question_set(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PublishQuestionSet>,
) -> AppResult<(StatusCode, Json<DataResponse<QuestionSetWithQuestions>>)> {
    let published = state.schema.publish_question_set(id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: published })))
}

/// POST /api/v1/question-sets/{id}/activate
pub async fn activate_question_set(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QuestionSet>>> {
    let set = state.schema.activate_question_set(id).await?;
    Ok(Json(DataResponse { data: set }))
}
