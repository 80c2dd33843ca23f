use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/commissions`.
///
/// ```text
/// GET    /                    -> commissions
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::commissions))
}
