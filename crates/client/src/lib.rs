//! Typed HTTP client for the FitTrack API.
//!
//! [`ApiClient`] keeps the bearer token from the last login, attaches it to
//! every request, and drops it when the server answers 401.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, ImageUpload, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use types::{AuthSession, Health, ProfileChanges, StoredImage, Trainer, Updated, User};
