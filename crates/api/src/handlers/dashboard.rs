//! Handlers for the commission and admin dashboards.

use axum::extract::State;
use axum::Json;
use intake_lifecycle::dashboard::{AdminDashboard, CommissionDashboard};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/commissions
///
/// Admins see the whole pipeline; producers see their own projects.
pub async fn commissions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CommissionDashboard>>> {
    let dashboard = state.lifecycle.commission_dashboard(&auth.actor()).await?;
    Ok(Json(DataResponse { data: dashboard }))
}

/// GET /api/v1/admin/dashboard
pub async fn admin_dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdminDashboard>>> {
    let dashboard = state.lifecycle.admin_dashboard().await?;
    Ok(Json(DataResponse { data: dashboard }))
}
