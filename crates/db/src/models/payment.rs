//! Payment model and DTOs.

use fittrack_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: DbId,
    pub user_id: DbId,
    pub payment_type: String,
    pub reference_id: Option<DbId>,
    pub amount_cents: Cents,
    pub currency: String,
    pub status: String,
    pub session_id: String,
    pub description: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreatePayment {
    pub user_id: DbId,
    pub payment_type: String,
    pub reference_id: Option<DbId>,
    pub amount_cents: Cents,
    pub currency: String,
    pub session_id: String,
    pub description: Option<String>,
}

/// Result of completing a pending payment.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedPayment {
    pub payment: Payment,
    /// Set when completing the payment activated a membership.
    pub membership: Option<crate::models::membership::Membership>,
}
