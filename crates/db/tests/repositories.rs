//! Repository behaviour against a real database.
//!
//! Requires PostgreSQL via `DATABASE_URL`; run with `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use fittrack_core::roles::ROLE_ID_USER;
use fittrack_db::models::membership::{CreatePlan, NewMembership};
use fittrack_db::models::payment::CreatePayment;
use fittrack_db::models::spa::{CreateSpaBooking, CreateSpaService};
use fittrack_db::models::user::{CreateUser, UpdateProfile};
use fittrack_db::repositories::{
    MembershipPlanRepo, MembershipRepo, PaymentRepo, SpaBookingRepo, SpaServiceRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Member".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role_id: ROLE_ID_USER,
            image_url: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_service(pool: &PgPool) -> i64 {
    SpaServiceRepo::create(
        pool,
        &CreateSpaService {
            name: "Hot Stone".to_string(),
            description: None,
            duration_mins: 60,
            price_cents: 4_500,
            image_url: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Activate a membership with `free_sessions` through a completed payment.
async fn activate_membership(pool: &PgPool, user_id: i64, free_sessions: i32) -> i64 {
    let plan = MembershipPlanRepo::create(
        pool,
        &CreatePlan {
            name: format!("Plan {free_sessions}"),
            description: None,
            price_cents: 9_900,
            duration_days: 30,
            free_spa_sessions: free_sessions,
            features: vec![],
        },
    )
    .await
    .unwrap();

    let payment = PaymentRepo::create(
        pool,
        &CreatePayment {
            user_id,
            payment_type: "membership".to_string(),
            reference_id: Some(plan.id),
            amount_cents: plan.price_cents,
            currency: "usd".to_string(),
            session_id: format!("sess-{}-{}", user_id, plan.id),
            description: None,
        },
    )
    .await
    .unwrap();

    let now = Utc::now();
    let completed = PaymentRepo::complete(
        pool,
        payment.id,
        Some(&NewMembership {
            user_id,
            plan_id: plan.id,
            starts_at: now,
            expires_at: now + Duration::days(30),
            free_spa_sessions: free_sessions,
        }),
    )
    .await
    .unwrap()
    .expect("payment was pending");
    completed.membership.expect("membership activated").id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    new_user(&pool, "dup@example.com").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Other".to_string(),
            email: "dup@example.com".to_string(),
            password_hash: "hash".to_string(),
            role_id: ROLE_ID_USER,
            image_url: None,
        },
    )
    .await
    .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn profile_update_keeps_unset_fields(pool: PgPool) {
    let id = new_user(&pool, "keep@example.com").await;

    let updated = UserRepo::update_profile(
        &pool,
        id,
        &UpdateProfile {
            age: Some(31),
            image_url: Some("/uploads/abc.png".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Member");
    assert_eq!(updated.age, Some(31));
    assert_eq!(updated.image_url.as_deref(), Some("/uploads/abc.png"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn payment_completion_replaces_previous_membership(pool: PgPool) {
    let user_id = new_user(&pool, "member@example.com").await;
    let first = activate_membership(&pool, user_id, 0).await;
    let second = activate_membership(&pool, user_id, 2).await;

    let history = MembershipRepo::list_for_user(&pool, user_id).await.unwrap();
    let old = history.iter().find(|m| m.id == first).unwrap();
    assert_eq!(old.status, "replaced");

    let active = MembershipRepo::find_active_for_user(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, second);
    assert_eq!(active.free_spa_sessions_remaining, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn completing_twice_is_a_no_op(pool: PgPool) {
    let user_id = new_user(&pool, "twice@example.com").await;
    let payment = PaymentRepo::create(
        &pool,
        &CreatePayment {
            user_id,
            payment_type: "training".to_string(),
            reference_id: None,
            amount_cents: 2_000,
            currency: "usd".to_string(),
            session_id: "sess-twice".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    assert!(PaymentRepo::complete(&pool, payment.id, None).await.unwrap().is_some());
    assert!(PaymentRepo::complete(&pool, payment.id, None).await.unwrap().is_none());

    let stored = PaymentRepo::find_by_session_id(&pool, "sess-twice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "completed");
    assert!(stored.completed_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn free_spa_session_is_consumed_and_restored(pool: PgPool) {
    let user_id = new_user(&pool, "spa@example.com").await;
    let service_id = new_service(&pool).await;
    let membership_id = activate_membership(&pool, user_id, 1).await;

    let booking_input = CreateSpaBooking {
        user_id,
        service_id,
        scheduled_at: Utc::now() + Duration::days(1),
        price_cents: 4_500,
        notes: None,
    };

    let free = SpaBookingRepo::create(&pool, &booking_input).await.unwrap();
    assert!(free.is_free_session);
    assert_eq!(free.price_cents, 0);
    assert_eq!(free.membership_id, Some(membership_id));

    let paid = SpaBookingRepo::create(&pool, &booking_input).await.unwrap();
    assert!(!paid.is_free_session);
    assert_eq!(paid.price_cents, 4_500);

    let cancelled = SpaBookingRepo::transition(&pool, free.id, "pending", "cancelled")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, "cancelled");

    let active = MembershipRepo::find_active_for_user(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.free_spa_sessions_remaining, 1);

    // Stale expected status: no change.
    let stale = SpaBookingRepo::transition(&pool, free.id, "pending", "confirmed")
        .await
        .unwrap();
    assert!(stale.is_none());
}
