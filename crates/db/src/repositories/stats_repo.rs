//! Dashboard aggregates.

use sqlx::PgPool;

use crate::models::stats::AdminStats;

pub struct StatsRepo;

impl StatsRepo {
    pub async fn admin_stats(pool: &PgPool) -> Result<AdminStats, sqlx::Error> {
        sqlx::query_as::<_, AdminStats>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM trainers) AS total_trainers,
                (SELECT COUNT(*) FROM appointments) AS total_appointments,
                (SELECT COUNT(*) FROM appointments WHERE status = 'pending') AS pending_appointments,
                (SELECT COUNT(*) FROM memberships
                    WHERE status = 'active' AND expires_at > NOW()) AS active_memberships,
                (SELECT COUNT(*) FROM spa_bookings) AS spa_bookings,
                (SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM payments
                    WHERE status = 'completed') AS total_revenue_cents",
        )
        .fetch_one(pool)
        .await
    }
}
