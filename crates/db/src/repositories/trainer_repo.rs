//! Repository for the `trainers` table.

use fittrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::trainer::{CreateTrainer, Trainer, TrainerProfile, UpdateTrainer};
use crate::models::user::{ImageRef, User};

const COLUMNS: &str = "id, user_id, specialties, phone, bio, image_url, availability, \
                       certifications, experience, hourly_rate_cents, created_at, updated_at";

/// Trainer columns joined with the account's name and email (`t` / `u` aliases).
const PROFILE_COLUMNS: &str = "t.id, t.user_id, u.name, u.email, t.specialties, t.phone, t.bio, \
                               t.image_url, t.availability, t.certifications, t.experience, \
                               t.hourly_rate_cents, t.created_at";

pub struct TrainerRepo;

impl TrainerRepo {
    pub async fn create(pool: &PgPool, input: &CreateTrainer) -> Result<Trainer, sqlx::Error> {
        let query = format!(
            "INSERT INTO trainers (user_id, specialties, phone, bio, image_url, hourly_rate_cents)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trainer>(&query)
            .bind(input.user_id)
            .bind(&input.specialties)
            .bind(&input.phone)
            .bind(&input.bio)
            .bind(&input.image_url)
            .bind(input.hourly_rate_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Trainer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trainers WHERE id = $1");
        sqlx::query_as::<_, Trainer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Trainer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trainers WHERE user_id = $1");
        sqlx::query_as::<_, Trainer>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_profile(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TrainerProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM trainers t
             JOIN users u ON u.id = t.user_id
             WHERE t.id = $1"
        );
        sqlx::query_as::<_, TrainerProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Trainer profiles of active accounts, ordered by name.
    pub async fn list_profiles(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TrainerProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM trainers t
             JOIN users u ON u.id = t.user_id
             WHERE u.is_active = true
             ORDER BY u.name ASC, t.id ASC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, TrainerProfile>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a trainer profile. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrainer,
    ) -> Result<Option<Trainer>, sqlx::Error> {
        let query = format!(
            "UPDATE trainers SET
                specialties = COALESCE($2, specialties),
                phone = COALESCE($3, phone),
                bio = COALESCE($4, bio),
                image_url = COALESCE($5, image_url),
                availability = COALESCE($6, availability),
                certifications = COALESCE($7, certifications),
                experience = COALESCE($8, experience),
                hourly_rate_cents = COALESCE($9, hourly_rate_cents)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trainer>(&query)
            .bind(id)
            .bind(&input.specialties)
            .bind(&input.phone)
            .bind(&input.bio)
            .bind(&input.image_url)
            .bind(&input.availability)
            .bind(&input.certifications)
            .bind(&input.experience)
            .bind(input.hourly_rate_cents)
            .fetch_optional(pool)
            .await
    }

    /// Delete the trainer profile and its account in one transaction.
    ///
    /// Returns `false` if the trainer did not exist.
    pub async fn delete_with_account(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let user_id: Option<(DbId,)> =
            sqlx::query_as("DELETE FROM trainers WHERE id = $1 RETURNING user_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((user_id,)) = user_id else {
            return Ok(false);
        };
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Distinct members who have booked this trainer, excluding cancelled bookings.
    pub async fn list_clients(pool: &PgPool, trainer_id: DbId) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT u.id, u.name, u.email, u.password_hash, u.role_id, u.image_url, u.age,
                    u.height_cm, u.weight_kg, u.gender, u.fitness_goals, u.is_active,
                    u.last_login_at, u.created_at, u.updated_at
             FROM users u
             WHERE EXISTS (
                 SELECT 1 FROM appointments a
                 WHERE a.user_id = u.id AND a.trainer_id = $1 AND a.status <> 'cancelled'
             )
             ORDER BY u.name ASC",
        )
        .bind(trainer_id)
        .fetch_all(pool)
        .await
    }

    /// Whether `user_id` has a non-cancelled appointment with this trainer.
    pub async fn has_client(
        pool: &PgPool,
        trainer_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM appointments
                 WHERE trainer_id = $1 AND user_id = $2 AND status <> 'cancelled'
             )",
        )
        .bind(trainer_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn list_image_refs(pool: &PgPool) -> Result<Vec<ImageRef>, sqlx::Error> {
        sqlx::query_as::<_, ImageRef>("SELECT id, image_url FROM trainers ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn reset_images(
        pool: &PgPool,
        ids: &[DbId],
        image_url: &str,
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("UPDATE trainers SET image_url = $2 WHERE id = ANY($1)")
            .bind(ids)
            .bind(image_url)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
