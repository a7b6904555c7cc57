//! Route definitions for the `/memberships` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::membership;
use crate::state::AppState;

/// Routes mounted at `/memberships`.
///
/// ```text
/// GET    /plans       -> list_plans
/// POST   /plans       -> create_plan (admin)
/// PUT    /plans/{id}  -> update_plan (admin)
/// DELETE /plans/{id}  -> delete_plan (admin, deactivates)
/// GET    /mine        -> mine
/// POST   /subscribe   -> subscribe
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/plans",
            get(membership::list_plans).post(membership::create_plan),
        )
        .route(
            "/plans/{id}",
            put(membership::update_plan).delete(membership::delete_plan),
        )
        .route("/mine", get(membership::mine))
        .route("/subscribe", post(membership::subscribe))
}
