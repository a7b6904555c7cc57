//! Route definitions for the `/appointments` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::appointment;
use crate::state::AppState;

/// Routes mounted at `/appointments`.
///
/// ```text
/// POST   /                      -> create
/// GET    /mine                  -> mine
/// GET    /trainer/{trainer_id}  -> for_trainer
/// PUT    /{id}                  -> update_status
/// DELETE /{id}                  -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(appointment::create))
        .route("/mine", get(appointment::mine))
        .route("/trainer/{trainer_id}", get(appointment::for_trainer))
        .route(
            "/{id}",
            put(appointment::update_status).delete(appointment::delete),
        )
}
