pub mod admin;
pub mod announcement;
pub mod appointment;
pub mod auth;
pub mod goal;
pub mod health;
pub mod membership;
pub mod notification;
pub mod payment;
pub mod spa;
pub mod trainer;
pub mod user;
pub mod workout;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                          health plus upload/payment flags
///
/// /auth/refresh                                    rotate refresh token (public)
/// /auth/logout                                     revoke sessions (auth)
///
/// /users/register                                  register (public, multipart or JSON)
/// /users/login                                     login (public)
/// /users                                           list (admin)
/// /users/profile                                   get, update (auth, multipart or JSON)
/// /users/update-fields                             JSON-only profile update (auth)
/// /users/{id}                                      get (staff), delete (admin)
/// /users/{id}/confirmed-appointments               self or admin
///
/// /trainers                                        public directory
/// /trainers/{id}                                   get (public), update (trainer self or admin)
/// /trainers/{id}/clients                           trainer self or admin
///
/// /appointments                                    book (auth)
/// /appointments/mine                               own bookings
/// /appointments/trainer/{trainer_id}               trainer schedule
/// /appointments/{id}                               status change, delete (admin)
///
/// /workouts                                        list, log
/// /workouts/{id}                                   get, update, delete
///
/// /goals                                           list, create
/// /goals/{id}                                      get, update, delete
/// /goals/{id}/progress                             record progress
///
/// /memberships/plans                               list (public), create (admin)
/// /memberships/plans/{id}                          update, deactivate (admin)
/// /memberships/mine                                active + history
/// /memberships/subscribe                           create pending payment
///
/// /payments                                        list (admin)
/// /payments/checkout                               create pending payment
/// /payments/verify-session                         look up by session id
/// /payments/mine                                   own payments
/// /payments/{id}/complete                          admin; idempotent
///
/// /spa/services                                    list (public), create (admin)
/// /spa/services/{id}                               get (public), update, delete (admin)
/// /spa/bookings                                    book (auth), list (admin)
/// /spa/bookings/mine                               own bookings
/// /spa/bookings/{id}/status                        status change (admin)
/// /spa/bookings/{id}/cancel                        owner or admin
/// /spa/reports                                     booking report (admin)
///
/// /announcements                                   active announcements (public)
///
/// /admin/stats                                     dashboard counts
/// /admin/trainers                                  create trainer account
/// /admin/trainers/{id}                             delete trainer account
/// /admin/users/{id}                                update name/email/role/active
/// /admin/announcements                             list all, create
/// /admin/announcements/{id}                        update, delete
/// /admin/maintenance/repair-images                 reset broken image references
///
/// /notifications                                   own notifications
/// /notifications/{id}/read                         mark read
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::api_router())
        // Token rotation and logout.
        .nest("/auth", auth::router())
        // Accounts, registration and profiles.
        .nest("/users", user::router())
        .nest("/trainers", trainer::router())
        .nest("/appointments", appointment::router())
        .nest("/workouts", workout::router())
        .nest("/goals", goal::router())
        // Plans, subscriptions and the payment ledger.
        .nest("/memberships", membership::router())
        .nest("/payments", payment::router())
        .nest("/spa", spa::router())
        .nest("/announcements", announcement::public_router())
        // Admin dashboard, account management and maintenance.
        .nest("/admin", admin::router())
        .nest("/notifications", notification::router())
}
