//! Admin dashboard, trainer account management and maintenance jobs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fittrack_core::error::CoreError;
use fittrack_core::images::{local_upload_file, needs_repair, DEFAULT_PROFILE_IMAGE};
use fittrack_core::roles::ROLE_ID_TRAINER;
use fittrack_core::types::{Cents, DbId};
use fittrack_core::validation::{normalize_email, require_non_blank, validate_email};
use fittrack_db::models::stats::AdminStats;
use fittrack_db::models::trainer::{CreateTrainer, Trainer};
use fittrack_db::models::user::{AdminUpdateUser, CreateUser, ImageRef, UserResponse};
use fittrack_db::repositories::{RoleRepo, StatsRepo, TrainerRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::handlers::user::to_response;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, ImageDataResponse};
use crate::state::AppState;
use crate::upload::{commit_with_image, lenient, ImageForm};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// New trainer account. Arrives as multipart text or JSON.
#[derive(Debug, Deserialize)]
pub struct CreateTrainerRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub specialties: Option<Vec<String>>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub hourly_rate_cents: Option<Cents>,
}

#[derive(Debug, Serialize)]
pub struct CreatedTrainer {
    pub user: UserResponse,
    pub trainer: Trainer,
}

/// Result of the image repair job.
#[derive(Debug, Serialize)]
pub struct RepairSummary {
    pub users_repaired: u64,
    pub trainers_repaired: u64,
    pub total: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<AdminStats>>> {
    let data = StatsRepo::admin_stats(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/admin/trainers
///
/// Creates the login account and the trainer profile. If the profile insert
/// fails the account is removed again.
pub async fn create_trainer(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut form: ImageForm<CreateTrainerRequest>,
) -> AppResult<(StatusCode, Json<ImageDataResponse<CreatedTrainer>>)> {
    require_non_blank("name", &form.fields.name)?;
    let email = normalize_email(&form.fields.email);
    validate_email(&email)?;
    validate_password_strength(&form.fields.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if form.fields.hourly_rate_cents.is_some_and(|r| r < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Hourly rate must not be negative".into(),
        )));
    }
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "User already exists".into(),
        )));
    }

    let password_hash = hash_password(&form.fields.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let image = form.resolve_image(&state.media).await?;
    let image_url = image
        .as_ref()
        .map_or_else(|| DEFAULT_PROFILE_IMAGE.to_string(), |i| i.url.clone());

    let user = commit_with_image(
        &state.media,
        image.as_ref(),
        UserRepo::create(
            &state.pool,
            &CreateUser {
                name: form.fields.name.trim().to_string(),
                email,
                password_hash,
                role_id: ROLE_ID_TRAINER,
                image_url: Some(image_url.clone()),
            },
        ),
    )
    .await?;

    let fields = form.fields;
    let profile = CreateTrainer {
        user_id: user.id,
        specialties: fields.specialties.unwrap_or_default(),
        phone: fields.phone,
        bio: fields.bio,
        image_url: Some(image_url),
        hourly_rate_cents: fields.hourly_rate_cents,
    };
    let trainer = match TrainerRepo::create(&state.pool, &profile).await {
        Ok(trainer) => trainer,
        Err(e) => {
            if let Err(cleanup) = UserRepo::delete(&state.pool, user.id).await {
                tracing::error!(
                    user_id = user.id,
                    error = %cleanup,
                    "Failed to remove account after trainer profile error"
                );
            }
            if let Some(resolved) = &image {
                state.media.discard(resolved).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        admin_id = admin.user_id,
        trainer_id = trainer.id,
        user_id = user.id,
        "Trainer account created"
    );

    let user = to_response(&state, user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ImageDataResponse {
            data: CreatedTrainer { user, trainer },
            image,
        }),
    ))
}

/// DELETE /api/admin/trainers/{id}
pub async fn delete_trainer(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TrainerRepo::delete_with_account(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Trainer",
            id,
        }));
    }
    tracing::info!(admin_id = admin.user_id, trainer_id = id, "Trainer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<AdminUpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    if let Some(email) = input.email.take() {
        let email = normalize_email(&email);
        validate_email(&email)?;
        input.email = Some(email);
    }
    if let Some(role_id) = input.role_id {
        if RoleRepo::find_by_id(&state.pool, role_id).await?.is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role id {role_id}"
            ))));
        }
        if id == admin.user_id {
            return Err(AppError::Core(CoreError::Conflict(
                "Admins cannot change their own role".into(),
            )));
        }
    }

    let user = UserRepo::admin_update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(DataResponse {
        data: to_response(&state, user).await?,
    }))
}

/// POST /api/admin/maintenance/repair-images
///
/// Points user and trainer images that are empty, or that reference a
/// deleted local upload, at the default profile image.
pub async fn repair_images(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<RepairSummary>>> {
    let users = broken_refs(&state, UserRepo::list_image_refs(&state.pool).await?).await;
    let users_repaired = UserRepo::reset_images(&state.pool, &users, DEFAULT_PROFILE_IMAGE).await?;

    let trainers = broken_refs(&state, TrainerRepo::list_image_refs(&state.pool).await?).await;
    let trainers_repaired =
        TrainerRepo::reset_images(&state.pool, &trainers, DEFAULT_PROFILE_IMAGE).await?;

    tracing::info!(
        admin_id = admin.user_id,
        users_repaired,
        trainers_repaired,
        "Image repair finished"
    );
    Ok(Json(DataResponse {
        data: RepairSummary {
            users_repaired,
            trainers_repaired,
            total: users_repaired + trainers_repaired,
        },
    }))
}

/// Ids whose image reference needs resetting.
async fn broken_refs(state: &AppState, refs: Vec<ImageRef>) -> Vec<DbId> {
    let media = &state.config.media;
    let mut present = std::collections::HashSet::new();
    for r in &refs {
        let Some(file) = r
            .image_url
            .as_deref()
            .and_then(|u| local_upload_file(u.trim(), &media.public_prefix))
        else {
            continue;
        };
        if tokio::fs::try_exists(media.upload_dir.join(file))
            .await
            .unwrap_or(false)
        {
            present.insert(file.to_string());
        }
    }

    refs.iter()
        .filter(|r| {
            needs_repair(r.image_url.as_deref(), &media.public_prefix, |f| {
                present.contains(f)
            })
        })
        .map(|r| r.id)
        .collect()
}
