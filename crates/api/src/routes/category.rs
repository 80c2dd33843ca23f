//! Route definitions for the `/categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create (admin)
/// GET    /{id}/questions         -> active_questions
/// GET    /{id}/question-sets     -> list_question_sets
/// POST   /{id}/question-sets     -> publish_question_set (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(category::list).post(category::create))
        .route("/{id}/questions", get(category::active_questions))
        .route(
            "/{id}/question-sets",
            get(category::list_question_sets).post(category::publish_question_set),
        )
}
