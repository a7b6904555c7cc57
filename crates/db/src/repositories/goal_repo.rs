//! Repository for the `goals` table.

use fittrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::goal::{CreateGoal, Goal, UpdateGoal};

const COLUMNS: &str = "id, user_id, trainer_id, created_by, goal_type, description, start_value, \
                       current_value, target_value, unit, deadline, status, created_at, updated_at";

pub struct GoalRepo;

impl GoalRepo {
    /// Insert a goal. `current_value` starts at `start_value`.
    pub async fn create(pool: &PgPool, input: &CreateGoal) -> Result<Goal, sqlx::Error> {
        let query = format!(
            "INSERT INTO goals
                (user_id, trainer_id, created_by, goal_type, description,
                 start_value, current_value, target_value, unit, deadline)
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(input.user_id)
            .bind(input.trainer_id)
            .bind(&input.created_by)
            .bind(&input.goal_type)
            .bind(&input.description)
            .bind(input.start_value)
            .bind(input.target_value)
            .bind(&input.unit)
            .bind(input.deadline)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM goals WHERE id = $1");
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Goal>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM goals WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Goal>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGoal,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!(
            "UPDATE goals SET
                goal_type = COALESCE($2, goal_type),
                description = COALESCE($3, description),
                target_value = COALESCE($4, target_value),
                unit = COALESCE($5, unit),
                deadline = COALESCE($6, deadline),
                status = COALESCE($7, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .bind(&input.goal_type)
            .bind(&input.description)
            .bind(input.target_value)
            .bind(&input.unit)
            .bind(input.deadline)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Record a new current value together with the status it implies.
    pub async fn record_progress(
        pool: &PgPool,
        id: DbId,
        current_value: f64,
        status: &str,
    ) -> Result<Option<Goal>, sqlx::Error> {
        let query = format!(
            "UPDATE goals SET current_value = $2, status = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Goal>(&query)
            .bind(id)
            .bind(current_value)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
