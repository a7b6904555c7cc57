use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
}

/// Extended payload for `/api/health`.
#[derive(Serialize)]
pub struct ApiHealthResponse {
    #[serde(flatten)]
    pub base: HealthResponse,
    /// Whether cloud image hosting credentials are present.
    pub image_host_configured: bool,
    /// Upload tiers in the order they are tried.
    pub image_stores: Vec<&'static str>,
    pub payments_configured: bool,
}

async fn probe(state: &AppState) -> HealthResponse {
    let db_healthy = fittrack_db::health_check(&state.pool).await.is_ok();
    let status = if db_healthy { "ok" } else { "degraded" };

    HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    }
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(probe(&state).await)
}

/// GET /api/health -- same, plus upload and payment configuration.
async fn api_health_check(State(state): State<AppState>) -> Json<ApiHealthResponse> {
    Json(ApiHealthResponse {
        base: probe(&state).await,
        image_host_configured: state.config.media.cloudinary.is_configured(),
        image_stores: state.media.store_names(),
        payments_configured: state.config.stripe_configured,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// The configuration-aware check, mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(api_health_check))
}
