//! Query string types shared across handlers.

use fittrack_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::Deserialize;

use crate::middleware::auth::AuthUser;

/// `?limit=&offset=`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` ready to bind.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// `?include_inactive=true` on listings of soft-deactivated records.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

impl IncludeInactiveParams {
    /// Whether to restrict a listing to active rows. Only admins may see
    /// inactive ones.
    pub fn active_only(&self, auth: Option<&AuthUser>) -> bool {
        !(self.include_inactive && auth.is_some_and(AuthUser::is_admin))
    }
}
