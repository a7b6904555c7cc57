//! Route definitions for the `/trainers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::trainer;
use crate::state::AppState;

/// Routes mounted at `/trainers`.
///
/// ```text
/// GET /              -> list
/// GET /{id}          -> get_by_id
/// PUT /{id}          -> update (multipart or JSON)
/// GET /{id}/clients  -> clients
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trainer::list))
        .route("/{id}", get(trainer::get_by_id).put(trainer::update))
        .route("/{id}/clients", get(trainer::clients))
}
