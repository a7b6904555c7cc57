//! Trainer appointments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use fittrack_core::appointment::{
    validate_duration, validate_transition, BookingStatus, DEFAULT_APPOINTMENT_MINS,
};
use fittrack_core::error::CoreError;
use fittrack_core::types::{DbId, Timestamp};
use fittrack_db::models::appointment::{Appointment, CreateAppointment};
use fittrack_db::repositories::{AppointmentRepo, TrainerRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::notification::notify;
use crate::handlers::trainer::find_owned;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    pub trainer_id: DbId,
    pub scheduled_at: Timestamp,
    pub duration_mins: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// POST /api/appointments
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<BookAppointmentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Appointment>>)> {
    let duration_mins = input.duration_mins.unwrap_or(DEFAULT_APPOINTMENT_MINS);
    validate_duration(duration_mins)?;
    if input.scheduled_at <= Utc::now() {
        return Err(AppError::Core(CoreError::Validation(
            "Appointments must be scheduled in the future".into(),
        )));
    }

    let trainer = TrainerRepo::find_by_id(&state.pool, input.trainer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Trainer",
            id: input.trainer_id,
        }))?;
    if trainer.user_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Trainers cannot book themselves".into(),
        )));
    }

    let appointment = AppointmentRepo::create(
        &state.pool,
        &CreateAppointment {
            user_id: auth.user_id,
            trainer_id: trainer.id,
            scheduled_at: input.scheduled_at,
            duration_mins,
            notes: input.notes,
        },
    )
    .await?;

    tracing::info!(
        appointment_id = appointment.id,
        user_id = auth.user_id,
        trainer_id = trainer.id,
        "Appointment requested"
    );
    notify(
        &state,
        trainer.user_id,
        "New appointment request",
        &format!(
            "A member requested a session on {}",
            appointment.scheduled_at.format("%Y-%m-%d %H:%M UTC")
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: appointment })))
}

/// GET /api/appointments/mine
pub async fn mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Appointment>>>> {
    let data = AppointmentRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/appointments/trainer/{trainer_id}
pub async fn for_trainer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(trainer_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Appointment>>>> {
    find_owned(&state, &auth, trainer_id).await?;
    let data = AppointmentRepo::list_for_trainer(&state.pool, trainer_id).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/appointments/{id}
///
/// The booked trainer or an admin may make any allowed transition; the
/// member who booked may only cancel.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let appointment = AppointmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))?;

    let next = validate_transition(&appointment.status, input.status.trim())?;

    let is_trainer = match TrainerRepo::find_by_user_id(&state.pool, auth.user_id).await? {
        Some(trainer) => trainer.id == appointment.trainer_id,
        None => false,
    };
    let is_owner = appointment.user_id == auth.user_id;
    let allowed = auth.is_admin() || is_trainer || (is_owner && next == BookingStatus::Cancelled);
    if !allowed {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot change this appointment".into(),
        )));
    }

    let updated =
        AppointmentRepo::update_status(&state.pool, id, &appointment.status, next.name())
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "Appointment was changed by another request; reload and try again".into(),
                ))
            })?;

    tracing::info!(
        appointment_id = id,
        status = next.name(),
        by = auth.user_id,
        "Appointment status changed"
    );
    if !is_owner {
        notify(
            &state,
            updated.user_id,
            "Appointment updated",
            &format!("Your appointment is now {}", next.name()),
        )
        .await;
    }

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/appointments/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if AppointmentRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))
    }
}
