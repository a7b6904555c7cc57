//! Domain rules for FitTrack.
//!
//! Everything here is pure: status enums and their transitions, validation
//! helpers, pagination clamping, and report aggregation. No I/O and no
//! dependency on the database crate; callers pass in data from repositories.

pub mod appointment;
pub mod error;
pub mod goal;
pub mod images;
pub mod membership;
pub mod pagination;
pub mod payment;
pub mod roles;
pub mod spa;
pub mod types;
pub mod validation;
