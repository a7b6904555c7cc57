//! Membership plan and membership models.

use fittrack_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `membership_plans` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MembershipPlan {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: Cents,
    pub duration_days: i32,
    pub free_spa_sessions: i32,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlan {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: Cents,
    pub duration_days: i32,
    pub free_spa_sessions: i32,
    pub features: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlan {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<Cents>,
    pub duration_days: Option<i32>,
    pub free_spa_sessions: Option<i32>,
    pub features: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// A row from the `memberships` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Membership {
    pub id: DbId,
    pub user_id: DbId,
    pub plan_id: DbId,
    pub payment_id: Option<DbId>,
    pub starts_at: Timestamp,
    pub expires_at: Timestamp,
    pub status: String,
    pub free_spa_sessions_remaining: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Membership to activate when its payment completes.
#[derive(Debug, Clone)]
pub struct NewMembership {
    pub user_id: DbId,
    pub plan_id: DbId,
    pub starts_at: Timestamp,
    pub expires_at: Timestamp,
    pub free_spa_sessions: i32,
}
