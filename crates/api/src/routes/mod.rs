pub mod admin;
pub mod category;
pub mod commission;
pub mod health;
pub mod notification;
pub mod project;
pub mod question_set;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /health                                   service + database health
///
/// /categories                               list, create (admin)
/// /categories/{id}/questions                active questions
/// /categories/{id}/question-sets            list versions, publish (admin)
/// /question-sets/{id}/activate              activate version (admin)
///
/// /projects                                 list, submit
/// /projects/{id}                            detail, resubmit, delete
/// /projects/{id}/submit                     submit a draft
/// /projects/{id}/review                     review (admin)
/// /projects/{id}/sow                        generate SOW (admin)
/// /projects/{id}/sow/send                   send SOW (admin)
/// /projects/{id}/advance                    manual status actions (admin)
/// /projects/{id}/mark-paid                  record payment (admin)
///
/// /commissions                              commission dashboard
/// /admin/dashboard                          pipeline overview (admin)
///
/// /notifications                            list, clear all
/// /notifications/read-all                   mark all read
/// /notifications/{id}/read                  mark one read
/// /notifications/{id}                       delete one
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/categories", category::router())
        .nest("/question-sets", question_set::router())
        .nest("/projects", project::router())
        .nest("/commissions", commission::router())
        .nest("/admin", admin::router())
        .nest("/notifications", notification::router())
}
