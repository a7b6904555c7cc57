//! Spa service and booking models.

use fittrack_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `spa_services` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SpaService {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub duration_mins: i32,
    pub price_cents: Cents,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateSpaService {
    pub name: String,
    pub description: Option<String>,
    pub duration_mins: i32,
    pub price_cents: Cents,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSpaService {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_mins: Option<i32>,
    pub price_cents: Option<Cents>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// A row from the `spa_bookings` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SpaBooking {
    pub id: DbId,
    pub user_id: DbId,
    pub service_id: DbId,
    pub membership_id: Option<DbId>,
    pub scheduled_at: Timestamp,
    pub status: String,
    pub price_cents: Cents,
    pub is_free_session: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Booking request after the service price has been looked up.
#[derive(Debug)]
pub struct CreateSpaBooking {
    pub user_id: DbId,
    pub service_id: DbId,
    pub scheduled_at: Timestamp,
    pub price_cents: Cents,
    pub notes: Option<String>,
}

/// Booking joined with its service name, fed to report aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct BookingFactRow {
    pub service_id: DbId,
    pub service_name: String,
    pub status: String,
    pub price_cents: Cents,
    pub is_free_session: bool,
}

impl From<BookingFactRow> for fittrack_core::spa::BookingFact {
    fn from(row: BookingFactRow) -> Self {
        Self {
            service_id: row.service_id,
            service_name: row.service_name,
            status: row.status,
            price_cents: row.price_cents,
            is_free_session: row.is_free_session,
        }
    }
}
