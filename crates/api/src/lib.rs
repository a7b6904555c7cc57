//! FitTrack API server library.
//!
//! Config, state, error mapping, extractors and routes live here so the
//! binary and the integration tests build the exact same application.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod upload;
