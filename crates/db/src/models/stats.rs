//! Aggregate counts for the admin dashboard.

use fittrack_core::types::Cents;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_trainers: i64,
    pub total_appointments: i64,
    pub pending_appointments: i64,
    pub active_memberships: i64,
    pub spa_bookings: i64,
    /// Sum of completed payments.
    pub total_revenue_cents: Cents,
}
