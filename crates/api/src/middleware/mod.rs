//! Request extractors for authentication and role checks.
//!
//! - [`auth::AuthUser`]: member resolved from the bearer token.
//! - [`rbac::RequireAdmin`]: admins only.
//! - [`rbac::RequireTrainer`]: trainers and admins.

pub mod auth;
pub mod rbac;
