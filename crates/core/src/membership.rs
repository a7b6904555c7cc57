//! Membership plan validation and lifecycle helpers.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::{Cents, Timestamp};

pub const MEMBERSHIP_STATUS_ACTIVE: &str = "active";
pub const MEMBERSHIP_STATUS_EXPIRED: &str = "expired";
pub const MEMBERSHIP_STATUS_CANCELLED: &str = "cancelled";
/// Superseded by a newer subscription for the same user.
pub const MEMBERSHIP_STATUS_REPLACED: &str = "replaced";

/// Longest plan we sell (two years).
pub const MAX_DURATION_DAYS: i32 = 730;

/// Validate the numeric fields of a membership plan.
pub fn validate_plan(
    price_cents: Cents,
    duration_days: i32,
    free_spa_sessions: i32,
) -> Result<(), CoreError> {
    if price_cents <= 0 {
        return Err(CoreError::Validation("Price must be positive".into()));
    }
    if duration_days <= 0 || duration_days > MAX_DURATION_DAYS {
        return Err(CoreError::Validation(format!(
            "Duration must be between 1 and {MAX_DURATION_DAYS} days"
        )));
    }
    if free_spa_sessions < 0 {
        return Err(CoreError::Validation(
            "Free spa sessions must not be negative".into(),
        ));
    }
    Ok(())
}

/// Expiry timestamp for a membership starting at `starts_at`.
pub fn expires_at(starts_at: Timestamp, duration_days: i32) -> Timestamp {
    starts_at + Duration::days(i64::from(duration_days))
}

/// A membership grants access when it is `active` and not past its expiry.
pub fn is_active(status: &str, expires_at: Timestamp, now: Timestamp) -> bool {
    status == MEMBERSHIP_STATUS_ACTIVE && expires_at > now
}

/// Whole days left before expiry (0 once expired).
pub fn days_remaining(expires_at: Timestamp, now: Timestamp) -> i64 {
    (expires_at - now).num_days().max(0)
}
