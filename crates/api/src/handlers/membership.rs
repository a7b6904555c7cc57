//! Membership plans and subscriptions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use fittrack_core::error::CoreError;
use fittrack_core::membership::{days_remaining, is_active, validate_plan};
use fittrack_core::payment::{validate_amount, PaymentType};
use fittrack_core::types::DbId;
use fittrack_core::validation::require_non_blank;
use fittrack_db::models::membership::{CreatePlan, Membership, MembershipPlan, UpdatePlan};
use fittrack_db::models::payment::{CreatePayment, Payment};
use fittrack_db::repositories::{MembershipPlanRepo, MembershipRepo, PaymentRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::payment::new_session_id;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration_days: i32,
    #[serde(default)]
    pub free_spa_sessions: i32,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub plan_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct ActiveMembership {
    #[serde(flatten)]
    pub membership: Membership,
    pub plan: Option<MembershipPlan>,
    pub days_remaining: i64,
}

/// A past or present membership.
#[derive(Debug, Serialize)]
pub struct MembershipEntry {
    #[serde(flatten)]
    pub membership: Membership,
    /// Active and not yet expired.
    pub is_current: bool,
}

#[derive(Debug, Serialize)]
pub struct MyMemberships {
    pub active: Option<ActiveMembership>,
    pub history: Vec<MembershipEntry>,
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// GET /api/memberships/plans
///
/// Admins may pass `?include_inactive=true`.
pub async fn list_plans(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<MembershipPlan>>>> {
    let data = MembershipPlanRepo::list(&state.pool, params.active_only(auth.as_ref())).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/memberships/plans (admin)
pub async fn create_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreatePlanRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MembershipPlan>>)> {
    require_non_blank("name", &input.name)?;
    validate_plan(input.price_cents, input.duration_days, input.free_spa_sessions)?;

    let plan = MembershipPlanRepo::create(
        &state.pool,
        &CreatePlan {
            name: input.name.trim().to_string(),
            description: input.description,
            price_cents: input.price_cents,
            duration_days: input.duration_days,
            free_spa_sessions: input.free_spa_sessions,
            features: input.features,
        },
    )
    .await?;
    tracing::info!(plan_id = plan.id, name = %plan.name, "Membership plan created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: plan })))
}

/// PUT /api/memberships/plans/{id} (admin)
pub async fn update_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePlan>,
) -> AppResult<Json<DataResponse<MembershipPlan>>> {
    let existing = find_plan(&state, id).await?;
    if let Some(name) = &input.name {
        require_non_blank("name", name)?;
    }
    validate_plan(
        input.price_cents.unwrap_or(existing.price_cents),
        input.duration_days.unwrap_or(existing.duration_days),
        input.free_spa_sessions.unwrap_or(existing.free_spa_sessions),
    )?;

    let data = MembershipPlanRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MembershipPlan",
            id,
        }))?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/memberships/plans/{id} (admin)
///
/// Plans are deactivated, not removed; existing memberships keep pointing
/// at them.
pub async fn delete_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_plan(&state, id).await?;
    MembershipPlanRepo::deactivate(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// GET /api/memberships/mine
pub async fn mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<MyMemberships>>> {
    let now = Utc::now();
    let active = match MembershipRepo::find_active_for_user(&state.pool, auth.user_id).await? {
        Some(membership) => {
            let plan = MembershipPlanRepo::find_by_id(&state.pool, membership.plan_id).await?;
            Some(ActiveMembership {
                days_remaining: days_remaining(membership.expires_at, now),
                membership,
                plan,
            })
        }
        None => None,
    };
    let history = MembershipRepo::list_for_user(&state.pool, auth.user_id)
        .await?
        .into_iter()
        .map(|membership| MembershipEntry {
            is_current: is_active(&membership.status, membership.expires_at, now),
            membership,
        })
        .collect();
    Ok(Json(DataResponse {
        data: MyMemberships { active, history },
    }))
}

/// POST /api/memberships/subscribe
///
/// Opens a pending membership payment. The membership itself starts when
/// that payment is completed.
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SubscribeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Payment>>)> {
    let plan = find_plan(&state, input.plan_id).await?;
    if !plan.is_active {
        return Err(AppError::Core(CoreError::Conflict(
            "This plan is no longer offered".into(),
        )));
    }
    validate_amount(plan.price_cents)?;

    let payment = PaymentRepo::create(
        &state.pool,
        &CreatePayment {
            user_id: auth.user_id,
            payment_type: PaymentType::Membership.name().to_string(),
            reference_id: Some(plan.id),
            amount_cents: plan.price_cents,
            currency: state.config.payments_currency.clone(),
            session_id: new_session_id(),
            description: Some(format!("{} membership", plan.name)),
        },
    )
    .await?;

    tracing::info!(
        payment_id = payment.id,
        user_id = auth.user_id,
        plan_id = plan.id,
        "Membership checkout opened"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: payment })))
}

pub(crate) async fn find_plan(state: &AppState, id: DbId) -> AppResult<MembershipPlan> {
    MembershipPlanRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MembershipPlan",
            id,
        }))
}
