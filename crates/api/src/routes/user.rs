//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{auth, user};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /register                    -> register (multipart or JSON)
/// POST   /login                       -> login
/// GET    /                            -> list (admin)
/// GET    /profile                     -> profile
/// PUT    /profile                     -> update_profile (multipart or JSON)
/// PUT    /update-fields               -> update_fields
/// GET    /{id}                        -> get_by_id (trainer or admin)
/// DELETE /{id}                        -> delete (admin)
/// GET    /{id}/confirmed-appointments -> confirmed_appointments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/", get(user::list))
        .route("/profile", get(user::profile).put(user::update_profile))
        .route("/update-fields", put(user::update_fields))
        .route("/{id}", get(user::get_by_id).delete(user::delete))
        .route(
            "/{id}/confirmed-appointments",
            get(user::confirmed_appointments),
        )
}
