//! Repositories for `membership_plans` and `memberships`.

use fittrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::membership::{CreatePlan, Membership, MembershipPlan, UpdatePlan};

const PLAN_COLUMNS: &str = "id, name, description, price_cents, duration_days, free_spa_sessions, \
                            features, is_active, created_at, updated_at";

pub(crate) const MEMBERSHIP_COLUMNS: &str = "id, user_id, plan_id, payment_id, starts_at, \
                                             expires_at, status, free_spa_sessions_remaining, \
                                             created_at, updated_at";

pub struct MembershipPlanRepo;

impl MembershipPlanRepo {
    pub async fn create(pool: &PgPool, input: &CreatePlan) -> Result<MembershipPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO membership_plans
                (name, description, price_cents, duration_days, free_spa_sessions, features)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PLAN_COLUMNS}"
        );
        sqlx::query_as::<_, MembershipPlan>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(input.duration_days)
            .bind(input.free_spa_sessions)
            .bind(&input.features)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MembershipPlan>, sqlx::Error> {
        let query = format!("SELECT {PLAN_COLUMNS} FROM membership_plans WHERE id = $1");
        sqlx::query_as::<_, MembershipPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Plans ordered by price. With `active_only`, retired plans are hidden.
    pub async fn list(
        pool: &PgPool,
        active_only: bool,
    ) -> Result<Vec<MembershipPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {PLAN_COLUMNS} FROM membership_plans
             WHERE ($1 = false OR is_active = true)
             ORDER BY price_cents ASC, id ASC"
        );
        sqlx::query_as::<_, MembershipPlan>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlan,
    ) -> Result<Option<MembershipPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE membership_plans SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price_cents = COALESCE($4, price_cents),
                duration_days = COALESCE($5, duration_days),
                free_spa_sessions = COALESCE($6, free_spa_sessions),
                features = COALESCE($7, features),
                is_active = COALESCE($8, is_active)
             WHERE id = $1
             RETURNING {PLAN_COLUMNS}"
        );
        sqlx::query_as::<_, MembershipPlan>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(input.duration_days)
            .bind(input.free_spa_sessions)
            .bind(&input.features)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Retire a plan. Existing memberships keep referencing it.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE membership_plans SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct MembershipRepo;

impl MembershipRepo {
    /// The member's current membership: status `active` and not yet expired.
    pub async fn find_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Membership>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships
             WHERE user_id = $1 AND status = 'active' AND expires_at > NOW()
             ORDER BY expires_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Membership>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Full membership history, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Membership>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE user_id = $1
             ORDER BY starts_at DESC, id DESC"
        );
        sqlx::query_as::<_, Membership>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
