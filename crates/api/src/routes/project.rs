//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> submit
/// GET    /{id}                -> get_by_id
/// PUT    /{id}                -> resubmit
/// DELETE /{id}                -> delete
/// POST   /{id}/submit         -> submit_draft
/// POST   /{id}/review         -> review (admin)
/// POST   /{id}/sow            -> generate_sow (admin)
/// POST   /{id}/sow/send       -> send_sow (admin)
/// POST   /{id}/advance        -> advance (admin)
/// POST   /{id}/mark-paid      -> mark_paid (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::submit))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::resubmit)
                .delete(project::delete),
        )
        .route("/{id}/submit", post(project::submit_draft))
        .route("/{id}/review", post(project::review))
        .route("/{id}/sow", post(project::generate_sow))
        .route("/{id}/sow/send", post(project::send_sow))
        .route("/{id}/advance", post(project::advance))
        .route("/{id}/mark-paid", post(project::mark_paid))
}
