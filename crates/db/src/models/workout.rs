//! Workout log model and DTOs.

use fittrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workouts` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Workout {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub workout_type: String,
    pub duration_mins: i32,
    pub calories_burned: Option<i32>,
    pub performed_at: Timestamp,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkout {
    pub user_id: DbId,
    pub name: String,
    pub workout_type: String,
    pub duration_mins: i32,
    pub calories_burned: Option<i32>,
    /// Defaults to now when omitted.
    pub performed_at: Option<Timestamp>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkout {
    pub name: Option<String>,
    pub workout_type: Option<String>,
    pub duration_mins: Option<i32>,
    pub calories_burned: Option<i32>,
    pub performed_at: Option<Timestamp>,
    pub notes: Option<String>,
}
