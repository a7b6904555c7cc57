//! Payments.
//!
//! Checkout opens a pending payment identified by a generated session id.
//! Completion is an admin action; completing a membership payment activates
//! the membership in the same transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use fittrack_core::error::CoreError;
use fittrack_core::membership::expires_at;
use fittrack_core::payment::{
    completion_action, validate_amount, validate_currency, CompletionAction, PaymentType,
};
use fittrack_core::types::{Cents, DbId};
use fittrack_db::models::membership::NewMembership;
use fittrack_db::models::payment::{CompletedPayment, CreatePayment, Payment};
use fittrack_db::repositories::PaymentRepo;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::membership::find_plan;
use crate::handlers::notification::notify;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub payment_type: String,
    pub reference_id: Option<DbId>,
    /// Ignored for membership payments, which use the plan price.
    pub amount_cents: Option<Cents>,
    pub currency: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifySessionParams {
    pub session_id: String,
}

/// POST /api/payments/checkout
pub async fn checkout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Payment>>)> {
    let payment_type = PaymentType::from_name(&input.payment_type)?;

    let (amount_cents, description) = match payment_type {
        PaymentType::Membership => {
            let plan_id = input.reference_id.ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "Membership payments need the plan id in 'reference_id'".into(),
                ))
            })?;
            let plan = find_plan(&state, plan_id).await?;
            if !plan.is_active {
                return Err(AppError::Core(CoreError::Conflict(
                    "This plan is no longer offered".into(),
                )));
            }
            (plan.price_cents, Some(format!("{} membership", plan.name)))
        }
        _ => (
            input.amount_cents.ok_or_else(|| {
                AppError::Core(CoreError::Validation("'amount_cents' is required".into()))
            })?,
            input.description,
        ),
    };
    validate_amount(amount_cents)?;

    let currency = input
        .currency
        .map(|c| c.trim().to_lowercase())
        .unwrap_or_else(|| state.config.payments_currency.clone());
    validate_currency(&currency)?;

    let payment = PaymentRepo::create(
        &state.pool,
        &CreatePayment {
            user_id: auth.user_id,
            payment_type: payment_type.name().to_string(),
            reference_id: input.reference_id,
            amount_cents,
            currency,
            session_id: new_session_id(),
            description,
        },
    )
    .await?;

    tracing::info!(
        payment_id = payment.id,
        user_id = auth.user_id,
        payment_type = payment_type.name(),
        amount_cents,
        "Checkout session created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: payment })))
}

/// GET /api/payments/verify-session?session_id=
pub async fn verify_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<VerifySessionParams>,
) -> AppResult<Json<DataResponse<CompletedPayment>>> {
    let payment = PaymentRepo::find_by_session_id(&state.pool, params.session_id.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation("Unknown payment session".into()))
        })?;
    auth.ensure_self_or_admin(payment.user_id)?;

    let membership = PaymentRepo::find_membership_for_payment(&state.pool, payment.id).await?;
    Ok(Json(DataResponse {
        data: CompletedPayment {
            payment,
            membership,
        },
    }))
}

/// POST /api/payments/{id}/complete (admin)
///
/// Idempotent: an already completed payment is returned unchanged.
pub async fn complete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CompletedPayment>>> {
    let payment = find_payment(&state, id).await?;

    if completion_action(&payment.status)? == CompletionAction::AlreadyDone {
        return Ok(Json(DataResponse {
            data: already_completed(&state, payment).await?,
        }));
    }

    let activation = match PaymentType::from_name(&payment.payment_type)? {
        PaymentType::Membership => {
            let plan_id = payment.reference_id.ok_or_else(|| {
                AppError::InternalError(format!("Membership payment {id} has no plan"))
            })?;
            let plan = find_plan(&state, plan_id).await?;
            let starts_at = Utc::now();
            Some(NewMembership {
                user_id: payment.user_id,
                plan_id: plan.id,
                starts_at,
                expires_at: expires_at(starts_at, plan.duration_days),
                free_spa_sessions: plan.free_spa_sessions,
            })
        }
        _ => None,
    };

    let completed = match PaymentRepo::complete(&state.pool, id, activation.as_ref()).await? {
        Some(completed) => completed,
        // Someone else completed it between our read and the update.
        None => {
            let payment = find_payment(&state, id).await?;
            completion_action(&payment.status)?;
            return Ok(Json(DataResponse {
                data: already_completed(&state, payment).await?,
            }));
        }
    };

    tracing::info!(
        payment_id = id,
        admin_id = admin.user_id,
        membership_id = completed.membership.as_ref().map(|m| m.id),
        "Payment completed"
    );
    notify(
        &state,
        completed.payment.user_id,
        "Payment received",
        &match &completed.membership {
            Some(m) => format!(
                "Your membership is active until {}",
                m.expires_at.format("%Y-%m-%d")
            ),
            None => "Thank you, your payment was received".to_string(),
        },
    )
    .await;

    Ok(Json(DataResponse { data: completed }))
}

/// GET /api/payments/mine
pub async fn mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    let data = PaymentRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/payments (admin)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    let (limit, offset) = params.resolve();
    let data = PaymentRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Opaque checkout session identifier.
pub(crate) fn new_session_id() -> String {
    format!("cs_{}", Uuid::new_v4().simple())
}

async fn find_payment(state: &AppState, id: DbId) -> AppResult<Payment> {
    PaymentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Payment",
            id,
        }))
}

async fn already_completed(state: &AppState, payment: Payment) -> AppResult<CompletedPayment> {
    let membership = PaymentRepo::find_membership_for_payment(&state.pool, payment.id).await?;
    Ok(CompletedPayment {
        payment,
        membership,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_prefixed_and_unique() {
        let a = new_session_id();
        let b = new_session_id();
        assert!(a.starts_with("cs_"));
        assert_eq!(a.len(), 35);
        assert_ne!(a, b);
    }
}
