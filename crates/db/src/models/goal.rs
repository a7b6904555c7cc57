//! Goal model and DTOs.

use fittrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `goals` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Goal {
    pub id: DbId,
    pub user_id: DbId,
    pub trainer_id: Option<DbId>,
    pub created_by: String,
    pub goal_type: String,
    pub description: Option<String>,
    pub start_value: f64,
    pub current_value: f64,
    pub target_value: f64,
    pub unit: Option<String>,
    pub deadline: Option<Timestamp>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoal {
    pub user_id: DbId,
    pub trainer_id: Option<DbId>,
    pub created_by: String,
    pub goal_type: String,
    pub description: Option<String>,
    pub start_value: f64,
    pub target_value: f64,
    pub unit: Option<String>,
    pub deadline: Option<Timestamp>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGoal {
    pub goal_type: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub deadline: Option<Timestamp>,
    pub status: Option<String>,
}
