//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::routes::announcement;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /stats                        -> stats
/// POST   /trainers                     -> create_trainer (multipart or JSON)
/// DELETE /trainers/{id}                -> delete_trainer
/// PUT    /users/{id}                   -> update_user
/// POST   /maintenance/repair-images    -> repair_images
/// /announcements                       -> announcement::admin_router
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route("/trainers", post(admin::create_trainer))
        .route("/trainers/{id}", delete(admin::delete_trainer))
        .route("/users/{id}", put(admin::update_user))
        .route("/maintenance/repair-images", post(admin::repair_images))
        .nest("/announcements", announcement::admin_router())
}
