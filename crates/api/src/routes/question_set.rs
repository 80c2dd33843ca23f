use axum::routing::post;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Routes mounted at `/question-sets`.
///
/// ```text
/// POST   /{id}/activate          -> activate_question_set (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/activate", post(category::activate_question_set))
}
