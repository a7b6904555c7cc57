//! Member accounts and profiles.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fittrack_core::error::CoreError;
use fittrack_core::types::DbId;
use fittrack_core::validation::{normalize_email, require_non_blank, validate_email};
use fittrack_db::models::appointment::AppointmentWithTrainer;
use fittrack_db::models::user::{UpdateProfile, User, UserResponse};
use fittrack_db::repositories::{AppointmentRepo, RoleRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireTrainer};
use crate::query::PaginationParams;
use crate::response::{DataResponse, ImageDataResponse};
use crate::state::AppState;
use crate::upload::{commit_update_with_image, lenient, ImageForm};

/// Editable profile fields. Arrives as multipart text or JSON.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub height_cm: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_list")]
    pub fitness_goals: Option<Vec<String>>,
}

impl ProfileFields {
    fn into_update(self) -> AppResult<UpdateProfile> {
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        let email = match self.email {
            Some(email) => {
                let email = normalize_email(&email);
                validate_email(&email)?;
                Some(email)
            }
            None => None,
        };
        if let Some(age) = self.age {
            if !(1..150).contains(&age) {
                return Err(AppError::Core(CoreError::Validation(
                    "Age must be between 1 and 149".into(),
                )));
            }
        }
        for (field, value) in [("height_cm", self.height_cm), ("weight_kg", self.weight_kg)] {
            if value.is_some_and(|v| v <= 0.0) {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "'{field}' must be positive"
                ))));
            }
        }

        Ok(UpdateProfile {
            name: self.name.map(|n| n.trim().to_string()),
            email,
            image_url: None,
            age: self.age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            gender: self.gender,
            fitness_goals: self.fitness_goals,
        })
    }
}

/// GET /api/users (admin)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let (limit, offset) = params.resolve();
    let users = UserRepo::list(&state.pool, limit, offset).await?;
    let data = to_responses(&state, users).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/users/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, auth.user_id).await?;
    let data = to_response(&state, user).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/users/profile
///
/// Multipart or JSON. Fields are validated first, then a new picture goes
/// through the image fallback chain before the row is touched. If the update
/// fails the stored picture is discarded.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    mut form: ImageForm<ProfileFields>,
) -> AppResult<Json<ImageDataResponse<UserResponse>>> {
    let fields = std::mem::take(&mut form.fields);
    let mut update = fields.into_update()?;
    let image = form.resolve_image(&state.media).await?;
    update.image_url = image.as_ref().map(|i| i.url.clone());

    let user = commit_update_with_image(
        &state.media,
        image.as_ref(),
        UserRepo::update_profile(&state.pool, auth.user_id, &update),
        CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        image_strategy = image.as_ref().map(|i| i.strategy),
        "Profile updated"
    );

    let data = to_response(&state, user).await?;
    Ok(Json(ImageDataResponse { data, image }))
}

/// PUT /api/users/update-fields
///
/// JSON only; never touches the picture.
pub async fn update_fields(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(fields): Json<ProfileFields>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let update = fields.into_update()?;
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    let data = to_response(&state, user).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/users/{id} (trainer or admin)
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireTrainer(_staff): RequireTrainer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, id).await?;
    let data = to_response(&state, user).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/users/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot delete their own account".into(),
        )));
    }
    if UserRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = id, admin_id = admin.user_id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

/// GET /api/users/{id}/confirmed-appointments (self or admin)
pub async fn confirmed_appointments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AppointmentWithTrainer>>>> {
    auth.ensure_self_or_admin(id)?;
    let data = AppointmentRepo::list_confirmed_for_user(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

pub(crate) async fn to_response(state: &AppState, user: User) -> AppResult<UserResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(UserResponse::from_user(user, role))
}

/// Resolve role names with a single roles query.
pub(crate) async fn to_responses(
    state: &AppState,
    users: Vec<User>,
) -> AppResult<Vec<UserResponse>> {
    let roles = RoleRepo::list(&state.pool).await?;
    Ok(users
        .into_iter()
        .map(|u| {
            let role = roles
                .iter()
                .find(|r| r.id == u.role_id)
                .map_or_else(|| "unknown".to_string(), |r| r.name.clone());
            UserResponse::from_user(u, role)
        })
        .collect())
}
