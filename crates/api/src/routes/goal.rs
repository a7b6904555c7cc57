//! Route definitions for the `/goals` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::goal;
use crate::state::AppState;

/// Routes mounted at `/goals`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// PUT    /{id}/progress  -> record_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(goal::list).post(goal::create))
        .route(
            "/{id}",
            get(goal::get_by_id).put(goal::update).delete(goal::delete),
        )
        .route("/{id}/progress", put(goal::record_progress))
}
