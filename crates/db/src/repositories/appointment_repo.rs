//! Repository for the `appointments` table.

use fittrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::appointment::{Appointment, AppointmentWithTrainer, CreateAppointment};

const COLUMNS: &str = "id, user_id, trainer_id, scheduled_at, duration_mins, status, notes, \
                       created_at, updated_at";

pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Book an appointment. New appointments start `pending`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments (user_id, trainer_id, scheduled_at, duration_mins, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(input.user_id)
            .bind(input.trainer_id)
            .bind(input.scheduled_at)
            .bind(input.duration_mins)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments WHERE user_id = $1 ORDER BY scheduled_at DESC"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_trainer(
        pool: &PgPool,
        trainer_id: DbId,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments WHERE trainer_id = $1 ORDER BY scheduled_at ASC"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(trainer_id)
            .fetch_all(pool)
            .await
    }

    /// Confirmed appointments of a member with the trainer's name.
    pub async fn list_confirmed_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AppointmentWithTrainer>, sqlx::Error> {
        sqlx::query_as::<_, AppointmentWithTrainer>(
            "SELECT a.id, a.trainer_id, u.name AS trainer_name, a.scheduled_at,
                    a.duration_mins, a.status, a.notes
             FROM appointments a
             JOIN trainers t ON t.id = a.trainer_id
             JOIN users u ON u.id = t.user_id
             WHERE a.user_id = $1 AND a.status = 'confirmed'
             ORDER BY a.scheduled_at ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Set a new status. Transition rules are checked by the caller.
    /// Move from `from` to `to`. Returns `None` if the row is gone or its
    /// status is no longer `from`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET status = $3 WHERE id = $1 AND status = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
