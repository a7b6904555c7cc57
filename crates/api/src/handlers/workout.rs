//! Workout log.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use fittrack_core::error::CoreError;
use fittrack_core::types::{DbId, Timestamp};
use fittrack_core::validation::{flatten_errors, require_non_blank};
use fittrack_db::models::workout::{CreateWorkout, UpdateWorkout, Workout};
use fittrack_db::repositories::WorkoutRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LogWorkoutRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 60))]
    pub workout_type: String,
    pub duration_mins: i32,
    pub calories_burned: Option<i32>,
    pub performed_at: Option<Timestamp>,
    pub notes: Option<String>,
}

/// GET /api/workouts
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Workout>>>> {
    let (limit, offset) = params.resolve();
    let data = WorkoutRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/workouts
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<LogWorkoutRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Workout>>)> {
    input.validate().map_err(|e| flatten_errors(&e))?;
    require_non_blank("name", &input.name)?;
    require_non_blank("workout_type", &input.workout_type)?;
    validate_numbers(Some(input.duration_mins), input.calories_burned)?;

    let workout = WorkoutRepo::create(
        &state.pool,
        &CreateWorkout {
            user_id: auth.user_id,
            name: input.name.trim().to_string(),
            workout_type: input.workout_type.trim().to_string(),
            duration_mins: input.duration_mins,
            calories_burned: input.calories_burned,
            performed_at: input.performed_at,
            notes: input.notes,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: workout })))
}

/// GET /api/workouts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Workout>>> {
    let data = find_owned(&state, &auth, id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/workouts/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkout>,
) -> AppResult<Json<DataResponse<Workout>>> {
    find_owned(&state, &auth, id).await?;
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    validate_numbers(input.duration_mins, input.calories_burned)?;

    let data = WorkoutRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Workout", id }))?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/workouts/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned(&state, &auth, id).await?;
    WorkoutRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_owned(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Workout> {
    let workout = WorkoutRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Workout", id }))?;
    auth.ensure_self_or_admin(workout.user_id)?;
    Ok(workout)
}

fn validate_numbers(duration_mins: Option<i32>, calories: Option<i32>) -> AppResult<()> {
    if duration_mins.is_some_and(|d| d <= 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Duration must be positive".into(),
        )));
    }
    if calories.is_some_and(|c| c < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Calories burned must not be negative".into(),
        )));
    }
    Ok(())
}
