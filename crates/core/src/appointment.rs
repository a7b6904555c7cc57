//! Booking lifecycle shared by trainer appointments and spa bookings.
//!
//! ```text
//! pending ──► confirmed ──► completed
//!    │            │
//!    └────────────┴──────► cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal.

use crate::error::CoreError;

/// Default appointment length when the client does not send one.
pub const DEFAULT_APPOINTMENT_MINS: i32 = 60;

/// Longest bookable appointment.
pub const MAX_APPOINTMENT_MINS: i32 = 240;

/// Status of an appointment or spa booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Parse from the database / API string form.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown status '{other}'. Must be one of: pending, confirmed, completed, cancelled"
            ))),
        }
    }

    /// Database / API string form.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

/// Validate a status change given the stored and requested status names.
///
/// Returns the parsed target status, or `Conflict` for a disallowed move.
pub fn validate_transition(current: &str, requested: &str) -> Result<BookingStatus, CoreError> {
    let from = BookingStatus::from_name(current)?;
    let to = BookingStatus::from_name(requested)?;
    if from.can_transition_to(to) {
        Ok(to)
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot change status from '{}' to '{}'",
            from.name(),
            to.name()
        )))
    }
}

/// Validate a requested appointment length in minutes.
pub fn validate_duration(mins: i32) -> Result<(), CoreError> {
    if mins <= 0 || mins > MAX_APPOINTMENT_MINS {
        return Err(CoreError::Validation(format!(
            "Duration must be between 1 and {MAX_APPOINTMENT_MINS} minutes"
        )));
    }
    Ok(())
}
