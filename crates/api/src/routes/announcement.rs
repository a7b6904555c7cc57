//! Route definitions for announcements.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::announcement;
use crate::state::AppState;

/// Routes mounted at `/announcements`.
///
/// ```text
/// GET / -> list_active
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(announcement::list_active))
}

/// Routes mounted at `/admin/announcements`.
///
/// ```text
/// GET    /      -> list_all
/// POST   /      -> create
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(announcement::list_all).post(announcement::create),
        )
        .route(
            "/{id}",
            put(announcement::update).delete(announcement::delete),
        )
}
