//! Fitness goal rules: goal types, creators, and progress completion.

use crate::error::CoreError;

pub const GOAL_STATUS_ACTIVE: &str = "active";
pub const GOAL_STATUS_COMPLETED: &str = "completed";
pub const GOAL_STATUS_ABANDONED: &str = "abandoned";

const VALID_STATUSES: &[&str] = &[GOAL_STATUS_ACTIVE, GOAL_STATUS_COMPLETED, GOAL_STATUS_ABANDONED];

pub const CREATED_BY_USER: &str = "user";
pub const CREATED_BY_TRAINER: &str = "trainer";

/// Accepted goal type slugs.
pub const GOAL_TYPES: &[&str] = &[
    "weight-loss",
    "weight-gain",
    "muscle-gain",
    "endurance",
    "flexibility",
    "strength",
    "steps",
    "custom",
];

pub fn validate_goal_type(goal_type: &str) -> Result<(), CoreError> {
    if GOAL_TYPES.contains(&goal_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid goal type '{goal_type}'. Must be one of: {}",
            GOAL_TYPES.join(", ")
        )))
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid goal status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Whether `current` has reached `target` moving away from `start`.
///
/// A goal whose target is below its start (weight loss) completes when the
/// current value drops to or below the target; otherwise it completes when
/// the current value rises to or above it.
pub fn is_target_reached(start: f64, current: f64, target: f64) -> bool {
    if target < start {
        current <= target
    } else {
        current >= target
    }
}

/// Status a goal should take after a progress update.
///
/// Abandoned goals stay abandoned; completed goals never regress.
pub fn status_after_progress(
    status: &str,
    start: f64,
    current: f64,
    target: f64,
) -> &'static str {
    match status {
        GOAL_STATUS_ABANDONED => GOAL_STATUS_ABANDONED,
        GOAL_STATUS_COMPLETED => GOAL_STATUS_COMPLETED,
        _ if is_target_reached(start, current, target) => GOAL_STATUS_COMPLETED,
        _ => GOAL_STATUS_ACTIVE,
    }
}

/// Percentage of the way from `start` to `target`, clamped to `0..=100`.
pub fn progress_percent(start: f64, current: f64, target: f64) -> f64 {
    let span = target - start;
    if span == 0.0 {
        return 100.0;
    }
    // `+ 0.0` turns a negative zero into a positive one.
    ((current - start) / span * 100.0).clamp(0.0, 100.0) + 0.0
}
