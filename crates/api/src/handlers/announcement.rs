//! Gym-wide announcements.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fittrack_core::error::CoreError;
use fittrack_core::types::DbId;
use fittrack_core::validation::{flatten_errors, require_non_blank};
use fittrack_db::models::announcement::{Announcement, CreateAnnouncement, UpdateAnnouncement};
use fittrack_db::repositories::AnnouncementRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "must be 1-5000 characters"))]
    pub content: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// GET /api/announcements
pub async fn list_active(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Announcement>>>> {
    let data = AnnouncementRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/admin/announcements
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Announcement>>>> {
    let data = AnnouncementRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/admin/announcements
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateAnnouncementRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Announcement>>)> {
    input.validate().map_err(|e| flatten_errors(&e))?;
    require_non_blank("title", &input.title)?;
    require_non_blank("content", &input.content)?;
    let announcement = AnnouncementRepo::create(
        &state.pool,
        &CreateAnnouncement {
            title: input.title.trim().to_string(),
            content: input.content,
            is_active: input.is_active,
            created_by: Some(admin.user_id),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: announcement })))
}

/// PUT /api/admin/announcements/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAnnouncement>,
) -> AppResult<Json<DataResponse<Announcement>>> {
    if let Some(title) = &input.title {
        require_non_blank("title", title)?;
    }
    let data = AnnouncementRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Announcement",
            id,
        }))?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/admin/announcements/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if AnnouncementRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Announcement",
            id,
        }))
    }
}
