//! Route definitions for the `/workouts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::workout;
use crate::state::AppState;

/// Routes mounted at `/workouts`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workout::list).post(workout::create))
        .route(
            "/{id}",
            get(workout::get_by_id)
                .put(workout::update)
                .delete(workout::delete),
        )
}
