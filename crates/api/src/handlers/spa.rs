//! Spa services, bookings and the booking report.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use fittrack_core::appointment::{validate_transition, BookingStatus};
use fittrack_core::error::CoreError;
use fittrack_core::spa::{build_report, validate_service, BookingFact, ReportPeriod, SpaReport};
use fittrack_core::types::{Cents, DbId, Timestamp};
use fittrack_core::validation::require_non_blank;
use fittrack_db::models::spa::{
    CreateSpaBooking, CreateSpaService, SpaBooking, SpaService, UpdateSpaService,
};
use fittrack_db::repositories::{SpaBookingRepo, SpaServiceRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::notification::notify;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{IncludeInactiveParams, PaginationParams};
use crate::response::{DataResponse, ImageDataResponse};
use crate::state::AppState;
use crate::upload::{commit_update_with_image, commit_with_image, lenient, ImageForm};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Spa service fields. Arrives as multipart text or JSON.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceFields {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub duration_mins: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub price_cents: Option<Cents>,
    #[serde(default, deserialize_with = "lenient::opt_parsed")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct BookSpaRequest {
    pub service_id: DbId,
    pub scheduled_at: Timestamp,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub period: Option<String>,
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// GET /api/spa/services
///
/// Admins may pass `?include_inactive=true`.
pub async fn list_services(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<SpaService>>>> {
    let data = SpaServiceRepo::list(&state.pool, params.active_only(auth.as_ref())).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/spa/services/{id}
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SpaService>>> {
    let data = find_service(&state, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/spa/services (admin)
///
/// Multipart or JSON; a picture goes through the image fallback chain.
pub async fn create_service(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut form: ImageForm<ServiceFields>,
) -> AppResult<(StatusCode, Json<ImageDataResponse<SpaService>>)> {
    let fields = std::mem::take(&mut form.fields);
    let name = fields
        .name
        .ok_or_else(|| AppError::Core(CoreError::Validation("'name' is required".into())))?;
    require_non_blank("name", &name)?;
    let (Some(duration_mins), Some(price_cents)) = (fields.duration_mins, fields.price_cents)
    else {
        return Err(AppError::Core(CoreError::Validation(
            "'duration_mins' and 'price_cents' are required".into(),
        )));
    };
    validate_service(duration_mins, price_cents)?;

    let image = form.resolve_image(&state.media).await?;
    let input = CreateSpaService {
        name: name.trim().to_string(),
        description: fields.description,
        duration_mins,
        price_cents,
        image_url: image.as_ref().map(|i| i.url.clone()),
    };
    let service = commit_with_image(
        &state.media,
        image.as_ref(),
        SpaServiceRepo::create(&state.pool, &input),
    )
    .await?;

    tracing::info!(
        service_id = service.id,
        image_strategy = image.as_ref().map(|i| i.strategy),
        "Spa service created"
    );
    Ok((
        StatusCode::CREATED,
        Json(ImageDataResponse {
            data: service,
            image,
        }),
    ))
}

/// PUT /api/spa/services/{id} (admin)
pub async fn update_service(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    mut form: ImageForm<ServiceFields>,
) -> AppResult<Json<ImageDataResponse<SpaService>>> {
    let existing = find_service(&state, id).await?;
    let fields = std::mem::take(&mut form.fields);
    if let Some(name) = &fields.name {
        require_non_blank("name", name)?;
    }
    validate_service(
        fields.duration_mins.unwrap_or(existing.duration_mins),
        fields.price_cents.unwrap_or(existing.price_cents),
    )?;

    let image = form.resolve_image(&state.media).await?;
    let input = UpdateSpaService {
        name: fields.name.map(|n| n.trim().to_string()),
        description: fields.description,
        duration_mins: fields.duration_mins,
        price_cents: fields.price_cents,
        image_url: image.as_ref().map(|i| i.url.clone()),
        is_active: fields.is_active,
    };
    let service = commit_update_with_image(
        &state.media,
        image.as_ref(),
        SpaServiceRepo::update(&state.pool, id, &input),
        CoreError::NotFound {
            entity: "SpaService",
            id,
        },
    )
    .await?;

    Ok(Json(ImageDataResponse {
        data: service,
        image,
    }))
}

/// DELETE /api/spa/services/{id} (admin)
pub async fn delete_service(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SpaServiceRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "SpaService",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

/// POST /api/spa/bookings
///
/// Uses a free session from the member's active membership when one is left.
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<BookSpaRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SpaBooking>>)> {
    let service = find_service(&state, input.service_id).await?;
    if !service.is_active {
        return Err(AppError::Core(CoreError::Conflict(
            "This service is not currently offered".into(),
        )));
    }
    if input.scheduled_at <= Utc::now() {
        return Err(AppError::Core(CoreError::Validation(
            "Bookings must be scheduled in the future".into(),
        )));
    }

    let booking = SpaBookingRepo::create(
        &state.pool,
        &CreateSpaBooking {
            user_id: auth.user_id,
            service_id: service.id,
            scheduled_at: input.scheduled_at,
            price_cents: service.price_cents,
            notes: input.notes,
        },
    )
    .await?;

    tracing::info!(
        booking_id = booking.id,
        user_id = auth.user_id,
        service_id = service.id,
        free = booking.is_free_session,
        "Spa booking created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// GET /api/spa/bookings/mine
pub async fn my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SpaBooking>>>> {
    let data = SpaBookingRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/spa/bookings (admin)
pub async fn list_bookings(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<SpaBooking>>>> {
    let (limit, offset) = params.resolve();
    let data = SpaBookingRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/spa/bookings/{id}/status (admin)
pub async fn update_booking_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<SpaBooking>>> {
    let booking = find_booking(&state, id).await?;
    let next = validate_transition(&booking.status, input.status.trim())?;
    let updated = transition(&state, &booking, next).await?;
    notify(
        &state,
        updated.user_id,
        "Spa booking updated",
        &format!("Your spa booking is now {}", next.name()),
    )
    .await;
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/spa/bookings/{id}/cancel (owner or admin)
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SpaBooking>>> {
    let booking = find_booking(&state, id).await?;
    auth.ensure_self_or_admin(booking.user_id)?;
    let next = validate_transition(&booking.status, BookingStatus::Cancelled.name())?;
    let updated = transition(&state, &booking, next).await?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// GET /api/spa/reports?period=week|month|year (admin)
pub async fn report(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<DataResponse<SpaReport>>> {
    let period = ReportPeriod::from_name(params.period.as_deref().unwrap_or("month"))?;
    let since = period.start(Utc::now());
    let facts: Vec<BookingFact> = SpaBookingRepo::report_facts(&state.pool, since)
        .await?
        .into_iter()
        .map(BookingFact::from)
        .collect();
    Ok(Json(DataResponse {
        data: build_report(period, &facts),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_service(state: &AppState, id: DbId) -> AppResult<SpaService> {
    SpaServiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SpaService",
            id,
        }))
}

async fn find_booking(state: &AppState, id: DbId) -> AppResult<SpaBooking> {
    SpaBookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SpaBooking",
            id,
        }))
}

/// Apply a validated transition, guarding against a concurrent change.
async fn transition(
    state: &AppState,
    booking: &SpaBooking,
    next: BookingStatus,
) -> AppResult<SpaBooking> {
    let updated = SpaBookingRepo::transition(&state.pool, booking.id, &booking.status, next.name())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Booking was changed by another request; reload and try again".into(),
            ))
        })?;
    tracing::info!(
        booking_id = booking.id,
        from = %booking.status,
        to = next.name(),
        restored_free_session = next == BookingStatus::Cancelled && booking.is_free_session,
        "Spa booking status changed"
    );
    Ok(updated)
}
