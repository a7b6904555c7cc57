//! User entity model and DTOs.

use fittrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash, so it is never serialized. Use
/// [`UserResponse`] for anything leaving the API.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub image_url: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    pub fitness_goals: Vec<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public user representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    /// Resolved role name (`"admin"`, `"trainer"`, `"user"`).
    pub role: String,
    pub role_id: DbId,
    pub image_url: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    pub fitness_goals: Vec<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl UserResponse {
    pub fn from_user(user: User, role: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role,
            role_id: user.role_id,
            image_url: user.image_url,
            age: user.age,
            height_cm: user.height_cm,
            weight_kg: user.weight_kg,
            gender: user.gender,
            fitness_goals: user.fitness_goals,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub image_url: Option<String>,
}

/// Self-service profile changes. `None` leaves a column untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    pub fitness_goals: Option<Vec<String>>,
}

/// Admin-only account changes.
#[derive(Debug, Default, Deserialize)]
pub struct AdminUpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// `(id, image_url)` pair scanned by the image repair job.
#[derive(Debug, Clone, FromRow)]
pub struct ImageRef {
    pub id: DbId,
    pub image_url: Option<String>,
}
