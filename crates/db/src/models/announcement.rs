//! Announcement model and DTOs.

use fittrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `announcements` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Announcement {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub is_active: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncement {
    pub title: String,
    pub content: String,
    pub is_active: bool,
    pub created_by: Option<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAnnouncement {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
}
