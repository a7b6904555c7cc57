//! Repositories for `spa_services` and `spa_bookings`.

use fittrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::spa::{
    BookingFactRow, CreateSpaBooking, CreateSpaService, SpaBooking, SpaService, UpdateSpaService,
};

const SERVICE_COLUMNS: &str = "id, name, description, duration_mins, price_cents, image_url, \
                               is_active, created_at, updated_at";

const BOOKING_COLUMNS: &str = "id, user_id, service_id, membership_id, scheduled_at, status, \
                               price_cents, is_free_session, notes, created_at, updated_at";

pub struct SpaServiceRepo;

impl SpaServiceRepo {
    pub async fn create(pool: &PgPool, input: &CreateSpaService) -> Result<SpaService, sqlx::Error> {
        let query = format!(
            "INSERT INTO spa_services (name, description, duration_mins, price_cents, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, SpaService>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.duration_mins)
            .bind(input.price_cents)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SpaService>, sqlx::Error> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM spa_services WHERE id = $1");
        sqlx::query_as::<_, SpaService>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List services by name. With `active_only`, inactive ones are hidden.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<SpaService>, sqlx::Error> {
        let query = format!(
            "SELECT {SERVICE_COLUMNS} FROM spa_services
             WHERE ($1 = false OR is_active = true)
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, SpaService>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSpaService,
    ) -> Result<Option<SpaService>, sqlx::Error> {
        let query = format!(
            "UPDATE spa_services SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                duration_mins = COALESCE($4, duration_mins),
                price_cents = COALESCE($5, price_cents),
                image_url = COALESCE($6, image_url),
                is_active = COALESCE($7, is_active)
             WHERE id = $1
             RETURNING {SERVICE_COLUMNS}"
        );
        sqlx::query_as::<_, SpaService>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.duration_mins)
            .bind(input.price_cents)
            .bind(&input.image_url)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM spa_services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct SpaBookingRepo;

impl SpaBookingRepo {
    /// Create a booking, consuming a free session from the member's active
    /// membership when one is left. Free bookings are stored at price 0.
    pub async fn create(pool: &PgPool, input: &CreateSpaBooking) -> Result<SpaBooking, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let membership: Option<(DbId,)> = sqlx::query_as(
            "UPDATE memberships
             SET free_spa_sessions_remaining = free_spa_sessions_remaining - 1
             WHERE id = (
                 SELECT id FROM memberships
                 WHERE user_id = $1
                   AND status = 'active'
                   AND expires_at > NOW()
                   AND free_spa_sessions_remaining > 0
                 ORDER BY expires_at DESC
                 LIMIT 1
                 FOR UPDATE
             )
             RETURNING id",
        )
        .bind(input.user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let membership_id = membership.map(|(id,)| id);
        let is_free = membership_id.is_some();
        let price = if is_free { 0 } else { input.price_cents };

        let query = format!(
            "INSERT INTO spa_bookings
                (user_id, service_id, membership_id, scheduled_at, price_cents, is_free_session, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {BOOKING_COLUMNS}"
        );
        let booking = sqlx::query_as::<_, SpaBooking>(&query)
            .bind(input.user_id)
            .bind(input.service_id)
            .bind(membership_id)
            .bind(input.scheduled_at)
            .bind(price)
            .bind(is_free)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(booking)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SpaBooking>, sqlx::Error> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM spa_bookings WHERE id = $1");
        sqlx::query_as::<_, SpaBooking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SpaBooking>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM spa_bookings WHERE user_id = $1
             ORDER BY scheduled_at DESC"
        );
        sqlx::query_as::<_, SpaBooking>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<SpaBooking>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM spa_bookings
             ORDER BY scheduled_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, SpaBooking>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Move a booking from `expected` to `status`. Cancelling a free booking
    /// gives the session back to its membership.
    ///
    /// Returns `None` if the booking is missing or no longer in `expected`.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        expected: &str,
        status: &str,
    ) -> Result<Option<SpaBooking>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE spa_bookings SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {BOOKING_COLUMNS}"
        );
        let Some(booking) = sqlx::query_as::<_, SpaBooking>(&query)
            .bind(id)
            .bind(expected)
            .bind(status)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if status == "cancelled" && booking.is_free_session {
            if let Some(membership_id) = booking.membership_id {
                sqlx::query(
                    "UPDATE memberships
                     SET free_spa_sessions_remaining = free_spa_sessions_remaining + 1
                     WHERE id = $1",
                )
                .bind(membership_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(booking))
    }

    /// Bookings created since `since`, joined with their service name.
    pub async fn report_facts(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<BookingFactRow>, sqlx::Error> {
        sqlx::query_as::<_, BookingFactRow>(
            "SELECT b.service_id, s.name AS service_name, b.status, b.price_cents,
                    b.is_free_session
             FROM spa_bookings b
             JOIN spa_services s ON s.id = b.service_id
             WHERE b.created_at >= $1",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
