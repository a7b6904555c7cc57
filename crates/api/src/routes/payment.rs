//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// GET  /                -> list (admin)
/// POST /checkout        -> checkout
/// GET  /verify-session  -> verify_session
/// GET  /mine            -> mine
/// POST /{id}/complete   -> complete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payment::list))
        .route("/checkout", post(payment::checkout))
        .route("/verify-session", get(payment::verify_session))
        .route("/mine", get(payment::mine))
        .route("/{id}/complete", post(payment::complete))
}
