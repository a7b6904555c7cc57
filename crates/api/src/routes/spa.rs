//! Route definitions for the `/spa` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::spa;
use crate::state::AppState;

/// Routes mounted at `/spa`.
///
/// ```text
/// GET    /services                -> list_services
/// POST   /services                -> create_service (admin)
/// GET    /services/{id}           -> get_service
/// PUT    /services/{id}           -> update_service (admin)
/// DELETE /services/{id}           -> delete_service (admin)
/// GET    /bookings                -> list_bookings (admin)
/// POST   /bookings                -> create_booking
/// GET    /bookings/mine           -> my_bookings
/// PUT    /bookings/{id}/status    -> update_booking_status (admin)
/// PUT    /bookings/{id}/cancel    -> cancel_booking
/// GET    /reports                 -> report (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/services",
            get(spa::list_services).post(spa::create_service),
        )
        .route(
            "/services/{id}",
            get(spa::get_service)
                .put(spa::update_service)
                .delete(spa::delete_service),
        )
        .route(
            "/bookings",
            get(spa::list_bookings).post(spa::create_booking),
        )
        .route("/bookings/mine", get(spa::my_bookings))
        .route("/bookings/{id}/status", put(spa::update_booking_status))
        .route("/bookings/{id}/cancel", put(spa::cancel_booking))
        .route("/reports", get(spa::report))
}
