use std::sync::Arc;

use fittrack_media::FallbackChain;

use crate::config::ServerConfig;

/// Shared state handed to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: fittrack_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Image fallback chain used by every endpoint that accepts a picture.
    pub media: Arc<FallbackChain>,
}
