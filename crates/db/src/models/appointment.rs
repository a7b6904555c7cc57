//! Appointment model and DTOs.

use fittrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `appointments` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: DbId,
    pub user_id: DbId,
    pub trainer_id: DbId,
    pub scheduled_at: Timestamp,
    pub duration_mins: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Appointment with the trainer's display name, used for a member's
/// confirmed-appointment list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AppointmentWithTrainer {
    pub id: DbId,
    pub trainer_id: DbId,
    pub trainer_name: String,
    pub scheduled_at: Timestamp,
    pub duration_mins: i32,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAppointment {
    pub user_id: DbId,
    pub trainer_id: DbId,
    pub scheduled_at: Timestamp,
    pub duration_mins: i32,
    pub notes: Option<String>,
}
