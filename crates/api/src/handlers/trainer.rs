//! Public trainer directory and trainer self-service.

use axum::extract::{Path, Query, State};
use axum::Json;
use fittrack_core::error::CoreError;
use fittrack_core::types::{Cents, DbId};
use fittrack_db::models::trainer::{Trainer, TrainerProfile, UpdateTrainer};
use fittrack_db::models::user::UserResponse;
use fittrack_db::repositories::TrainerRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::user::to_responses;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{DataResponse, ImageDataResponse};
use crate::state::AppState;
use crate::upload::{commit_update_with_image, lenient, ImageForm};

/// Editable trainer profile fields. Arrives as multipart text or JSON.
#[derive(Debug, Default, Deserialize)]
pub struct TrainerFields {
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub specialties: Option<Vec<String>>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_json")]
    pub availability: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::opt_json")]
    pub certifications: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::opt_json")]
    pub experience: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub hourly_rate_cents: Option<Cents>,
}

impl TrainerFields {
    fn into_update(self) -> AppResult<UpdateTrainer> {
        if self.hourly_rate_cents.is_some_and(|r| r < 0) {
            return Err(AppError::Core(CoreError::Validation(
                "Hourly rate must not be negative".into(),
            )));
        }
        for (field, value) in [
            ("availability", &self.availability),
            ("certifications", &self.certifications),
            ("experience", &self.experience),
        ] {
            if value.as_ref().is_some_and(|v| !v.is_array()) {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "'{field}' must be a list"
                ))));
            }
        }
        Ok(UpdateTrainer {
            specialties: self.specialties,
            phone: self.phone,
            bio: self.bio,
            image_url: None,
            availability: self.availability,
            certifications: self.certifications,
            experience: self.experience,
            hourly_rate_cents: self.hourly_rate_cents,
        })
    }
}

/// GET /api/trainers
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<TrainerProfile>>>> {
    let (limit, offset) = params.resolve();
    let data = TrainerRepo::list_profiles(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/trainers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TrainerProfile>>> {
    let data = TrainerRepo::find_profile(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Trainer", id }))?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/trainers/{id} (the trainer themself, or an admin)
///
/// Multipart or JSON; a new picture goes through the image fallback chain.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    mut form: ImageForm<TrainerFields>,
) -> AppResult<Json<ImageDataResponse<Trainer>>> {
    find_owned(&state, &auth, id).await?;

    let mut update = std::mem::take(&mut form.fields).into_update()?;
    let image = form.resolve_image(&state.media).await?;
    update.image_url = image.as_ref().map(|i| i.url.clone());

    let trainer = commit_update_with_image(
        &state.media,
        image.as_ref(),
        TrainerRepo::update(&state.pool, id, &update),
        CoreError::NotFound { entity: "Trainer", id },
    )
    .await?;

    tracing::info!(
        trainer_id = id,
        image_strategy = image.as_ref().map(|i| i.strategy),
        "Trainer profile updated"
    );
    Ok(Json(ImageDataResponse {
        data: trainer,
        image,
    }))
}

/// GET /api/trainers/{id}/clients (the trainer themself, or an admin)
pub async fn clients(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    find_owned(&state, &auth, id).await?;
    let users = TrainerRepo::list_clients(&state.pool, id).await?;
    let data = to_responses(&state, users).await?;
    Ok(Json(DataResponse { data }))
}

/// Load trainer `id`, allowing only its own account or an admin.
pub(crate) async fn find_owned(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Trainer> {
    let trainer = TrainerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Trainer", id }))?;
    if trainer.user_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only this trainer or an admin can do that".into(),
        )));
    }
    Ok(trainer)
}
