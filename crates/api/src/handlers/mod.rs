//! Request handlers, one module per resource.
//!
//! Handlers validate input with `fittrack_core` rules, call the matching
//! repository in `fittrack_db`, and map failures through [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod admin;
pub mod announcement;
pub mod appointment;
pub mod auth;
pub mod goal;
pub mod membership;
pub mod notification;
pub mod payment;
pub mod spa;
pub mod trainer;
pub mod user;
pub mod workout;
