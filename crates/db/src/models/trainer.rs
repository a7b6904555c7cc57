//! Trainer profile model and DTOs.

use fittrack_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `trainers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trainer {
    pub id: DbId,
    pub user_id: DbId,
    pub specialties: Vec<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub availability: serde_json::Value,
    pub certifications: serde_json::Value,
    pub experience: serde_json::Value,
    pub hourly_rate_cents: Option<Cents>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Trainer profile joined with the owning account's name and email.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TrainerProfile {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub specialties: Vec<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub availability: serde_json::Value,
    pub certifications: serde_json::Value,
    pub experience: serde_json::Value,
    pub hourly_rate_cents: Option<Cents>,
    pub created_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTrainer {
    pub user_id: DbId,
    pub specialties: Vec<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub hourly_rate_cents: Option<Cents>,
}

/// DTO for updating a trainer profile. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTrainer {
    pub specialties: Option<Vec<String>>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub availability: Option<serde_json::Value>,
    pub certifications: Option<serde_json::Value>,
    pub experience: Option<serde_json::Value>,
    pub hourly_rate_cents: Option<Cents>,
}
