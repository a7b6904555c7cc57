//! In-app notifications.

use axum::extract::{Path, Query, State};
use axum::Json;
use fittrack_core::error::CoreError;
use fittrack_core::types::DbId;
use fittrack_db::models::notification::Notification;
use fittrack_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let (limit, offset) = params.resolve();
    let data = NotificationRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let data = NotificationRepo::mark_read(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))?;
    Ok(Json(DataResponse { data }))
}

/// Best-effort notification; a failure is logged and never fails the request.
pub(crate) async fn notify(state: &AppState, user_id: DbId, title: &str, message: &str) {
    if let Err(e) = NotificationRepo::create(&state.pool, user_id, title, message).await {
        tracing::warn!(user_id, error = %e, "Failed to create notification");
    }
}
