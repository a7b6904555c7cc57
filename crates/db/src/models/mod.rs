//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` create / update DTOs used by the repositories

pub mod announcement;
pub mod appointment;
pub mod goal;
pub mod membership;
pub mod notification;
pub mod payment;
pub mod role;
pub mod session;
pub mod spa;
pub mod stats;
pub mod trainer;
pub mod user;
pub mod workout;
