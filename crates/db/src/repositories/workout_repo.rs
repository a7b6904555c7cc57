//! Repository for the `workouts` table.

use fittrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::workout::{CreateWorkout, UpdateWorkout, Workout};

const COLUMNS: &str = "id, user_id, name, workout_type, duration_mins, calories_burned, \
                       performed_at, notes, created_at, updated_at";

pub struct WorkoutRepo;

impl WorkoutRepo {
    pub async fn create(pool: &PgPool, input: &CreateWorkout) -> Result<Workout, sqlx::Error> {
        let query = format!(
            "INSERT INTO workouts
                (user_id, name, workout_type, duration_mins, calories_burned, performed_at, notes)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.workout_type)
            .bind(input.duration_mins)
            .bind(input.calories_burned)
            .bind(input.performed_at)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workouts WHERE id = $1");
        sqlx::query_as::<_, Workout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A member's workouts, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Workout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workouts WHERE user_id = $1
             ORDER BY performed_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkout,
    ) -> Result<Option<Workout>, sqlx::Error> {
        let query = format!(
            "UPDATE workouts SET
                name = COALESCE($2, name),
                workout_type = COALESCE($3, workout_type),
                duration_mins = COALESCE($4, duration_mins),
                calories_burned = COALESCE($5, calories_burned),
                performed_at = COALESCE($6, performed_at),
                notes = COALESCE($7, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.workout_type)
            .bind(input.duration_mins)
            .bind(input.calories_burned)
            .bind(input.performed_at)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
