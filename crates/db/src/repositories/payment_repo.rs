//! Repository for the `payments` table.

use fittrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::membership::{Membership, NewMembership};
use crate::models::payment::{CompletedPayment, CreatePayment, Payment};
use crate::repositories::membership_repo::MEMBERSHIP_COLUMNS;

const COLUMNS: &str = "id, user_id, payment_type, reference_id, amount_cents, currency, status, \
                       session_id, description, completed_at, created_at, updated_at";

pub struct PaymentRepo;

impl PaymentRepo {
    /// Insert a new payment in `pending` status.
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments
                (user_id, payment_type, reference_id, amount_cents, currency, session_id, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.user_id)
            .bind(&input.payment_type)
            .bind(input.reference_id)
            .bind(input.amount_cents)
            .bind(&input.currency)
            .bind(&input.session_id)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_session_id(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE session_id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a pending payment completed and, when `activate` is given, start
    /// the membership it paid for. The member's previous active membership is
    /// marked `replaced`. Everything happens in one transaction.
    ///
    /// Returns `None` if the payment was not pending (already completed by a
    /// concurrent request, or missing).
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        activate: Option<&NewMembership>,
    ) -> Result<Option<CompletedPayment>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE payments SET status = 'completed', completed_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        let Some(payment) = sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let membership = match activate {
            Some(new) => {
                sqlx::query(
                    "UPDATE memberships SET status = 'replaced'
                     WHERE user_id = $1 AND status = 'active'",
                )
                .bind(new.user_id)
                .execute(&mut *tx)
                .await?;

                let query = format!(
                    "INSERT INTO memberships
                        (user_id, plan_id, payment_id, starts_at, expires_at,
                         free_spa_sessions_remaining)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING {MEMBERSHIP_COLUMNS}"
                );
                let membership = sqlx::query_as::<_, Membership>(&query)
                    .bind(new.user_id)
                    .bind(new.plan_id)
                    .bind(payment.id)
                    .bind(new.starts_at)
                    .bind(new.expires_at)
                    .bind(new.free_spa_sessions)
                    .fetch_one(&mut *tx)
                    .await?;
                Some(membership)
            }
            None => None,
        };

        tx.commit().await?;
        Ok(Some(CompletedPayment {
            payment,
            membership,
        }))
    }

    /// The membership activated by a completed payment, if any.
    pub async fn find_membership_for_payment(
        pool: &PgPool,
        payment_id: DbId,
    ) -> Result<Option<Membership>, sqlx::Error> {
        let query = format!("SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE payment_id = $1");
        sqlx::query_as::<_, Membership>(&query)
            .bind(payment_id)
            .fetch_optional(pool)
            .await
    }
}
