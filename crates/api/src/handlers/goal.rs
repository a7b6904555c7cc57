//! Fitness goals set by members or by their trainers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fittrack_core::error::CoreError;
use fittrack_core::goal::{
    progress_percent, status_after_progress, validate_goal_type, validate_status,
    CREATED_BY_TRAINER, CREATED_BY_USER,
};
use fittrack_core::types::{DbId, Timestamp};
use fittrack_db::models::goal::{CreateGoal, Goal, UpdateGoal};
use fittrack_db::repositories::{GoalRepo, TrainerRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::notification::notify;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    /// Member the goal is for. Omit to set a goal for yourself.
    pub user_id: Option<DbId>,
    pub goal_type: String,
    pub description: Option<String>,
    pub start_value: f64,
    pub target_value: f64,
    pub unit: Option<String>,
    pub deadline: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub current_value: f64,
}

/// A goal with its completion percentage.
#[derive(Debug, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress_percent: f64,
}

impl From<Goal> for GoalView {
    fn from(goal: Goal) -> Self {
        let progress_percent =
            progress_percent(goal.start_value, goal.current_value, goal.target_value);
        Self {
            goal,
            progress_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/goals
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<GoalView>>>> {
    let goals = GoalRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: goals.into_iter().map(GoalView::from).collect(),
    }))
}

/// POST /api/goals
///
/// Members set goals for themselves. A trainer may set one for a client
/// (`user_id`) they have appointments with; admins for anyone.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateGoalRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<GoalView>>)> {
    validate_goal_type(&input.goal_type)?;
    validate_values(&[input.start_value, input.target_value])?;

    let target_user = input.user_id.unwrap_or(auth.user_id);
    let (created_by, trainer_id) = if target_user == auth.user_id {
        (CREATED_BY_USER, None)
    } else {
        let trainer = TrainerRepo::find_by_user_id(&state.pool, auth.user_id).await?;
        let trainer_id = match trainer {
            Some(t) => TrainerRepo::has_client(&state.pool, t.id, target_user)
                .await?
                .then_some(t.id),
            None => None,
        };
        if trainer_id.is_none() && !auth.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "You can only set goals for yourself or your clients".into(),
            )));
        }
        if UserRepo::find_by_id(&state.pool, target_user).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: target_user,
            }));
        }
        (CREATED_BY_TRAINER, trainer_id)
    };

    let goal = GoalRepo::create(
        &state.pool,
        &CreateGoal {
            user_id: target_user,
            trainer_id,
            created_by: created_by.to_string(),
            goal_type: input.goal_type,
            description: input.description,
            start_value: input.start_value,
            target_value: input.target_value,
            unit: input.unit,
            deadline: input.deadline,
        },
    )
    .await?;

    tracing::info!(goal_id = goal.id, user_id = target_user, created_by, "Goal created");
    if created_by == CREATED_BY_TRAINER {
        notify(
            &state,
            target_user,
            "New goal from your trainer",
            &format!("A new {} goal was set for you", goal.goal_type),
        )
        .await;
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: goal.into() })))
}

/// GET /api/goals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GoalView>>> {
    let goal = find_accessible(&state, &auth, id).await?;
    Ok(Json(DataResponse { data: goal.into() }))
}

/// PUT /api/goals/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGoal>,
) -> AppResult<Json<DataResponse<GoalView>>> {
    find_accessible(&state, &auth, id).await?;
    if let Some(goal_type) = &input.goal_type {
        validate_goal_type(goal_type)?;
    }
    if let Some(status) = &input.status {
        validate_status(status)?;
    }
    if let Some(target) = input.target_value {
        validate_values(&[target])?;
    }

    let goal = GoalRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Goal", id }))?;
    Ok(Json(DataResponse { data: goal.into() }))
}

/// PUT /api/goals/{id}/progress
///
/// Records the latest measurement; reaching the target completes the goal.
pub async fn record_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ProgressRequest>,
) -> AppResult<Json<DataResponse<GoalView>>> {
    let goal = find_accessible(&state, &auth, id).await?;
    validate_values(&[input.current_value])?;

    let status = status_after_progress(
        &goal.status,
        goal.start_value,
        input.current_value,
        goal.target_value,
    );
    let updated = GoalRepo::record_progress(&state.pool, id, input.current_value, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Goal", id }))?;

    if status != goal.status {
        tracing::info!(goal_id = id, from = %goal.status, to = status, "Goal status changed");
    }
    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// DELETE /api/goals/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_accessible(&state, &auth, id).await?;
    GoalRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Owner, the assigned trainer, or an admin.
async fn find_accessible(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Goal> {
    let goal = GoalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Goal", id }))?;
    if goal.user_id == auth.user_id || auth.is_admin() {
        return Ok(goal);
    }
    if let Some(trainer_id) = goal.trainer_id {
        if let Some(trainer) = TrainerRepo::find_by_user_id(&state.pool, auth.user_id).await? {
            if trainer.id == trainer_id {
                return Ok(goal);
            }
        }
    }
    Err(AppError::Core(CoreError::Forbidden(
        "You cannot access this goal".into(),
    )))
}

fn validate_values(values: &[f64]) -> AppResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(
            "Goal values must be finite numbers".into(),
        )))
    }
}
