//! HTTP-level tests for registration, login, token rotation and role gates.
//!
//! Extractor rejections run without a database. Full flows need PostgreSQL
//! and are `#[ignore]`d unless run with `cargo test -- --ignored`.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{
    body_json, get, get_auth, post_json, post_json_auth, put_json_auth, send, token_for,
};
use fittrack_api::auth::password::hash_password;
use fittrack_core::images::DEFAULT_PROFILE_IMAGE;
use fittrack_core::roles::{ROLE_ID_ADMIN, ROLE_ID_USER};
use fittrack_db::models::user::{CreateUser, User};
use fittrack_db::repositories::UserRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Extractor rejections (no database)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_returns_401() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/users/profile").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn non_bearer_scheme_returns_401() {
    let app = common::build_test_app(common::lazy_pool());
    let request = Request::builder()
        .uri("/api/workouts")
        .header("authorization", "Basic Zm9vOmJhcg==")
        .body(Body::empty())
        .unwrap();

    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_returns_401() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get_auth(app, "/api/goals", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn member_cannot_reach_admin_routes() {
    let app = common::build_test_app(common::lazy_pool());
    let token = token_for(10, "user");

    let response = get_auth(app.clone(), "/api/admin/stats", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Admin role required");

    let response = get_auth(app, "/api/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn member_cannot_look_up_other_users() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get_auth(app, "/api/users/2", &token_for(10, "user")).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["error"],
        "Trainer or Admin role required"
    );
}

#[tokio::test]
async fn malformed_json_body_returns_400() {
    let app = common::build_test_app(common::lazy_pool());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn short_password_rejected_before_any_lookup() {
    let app = common::build_test_app(common::lazy_pool());
    let body = serde_json::json!({
        "name": "Ada",
        "email": "ada@example.com",
        "password": "short",
    });

    let response = post_json(app, "/api/users/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PASSWORD: &str = "correct-horse-battery";

async fn create_user(pool: &PgPool, email: &str, role_id: i64) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            role_id,
            image_url: Some(DEFAULT_PROFILE_IMAGE.to_string()),
        },
    )
    .await
    .expect("user creation should succeed")
}

async fn login(app: axum::Router, email: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": PASSWORD });
    let response = post_json(app, "/api/users/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Database-backed flows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn register_without_image_gets_default_picture(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "name": "Grace",
        "email": "Grace@Example.com",
        "password": PASSWORD,
    });

    let response = post_json(app.clone(), "/api/users/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["email"], "grace@example.com");
    assert_eq!(json["user"]["role"], "user");
    assert_eq!(json["user"]["image_url"], DEFAULT_PROFILE_IMAGE);
    assert!(json.get("image").is_none());

    let again = serde_json::json!({
        "name": "Grace",
        "email": "grace@example.com",
        "password": PASSWORD,
    });
    let response = post_json(app, "/api/users/register", again).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "User already exists");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn login_rejects_wrong_password_and_inactive_accounts(pool: PgPool) {
    let user = create_user(&pool, "member@example.com", ROLE_ID_USER).await;
    let app = common::build_test_app(pool.clone());

    let wrong = serde_json::json!({ "email": "member@example.com", "password": "nope-nope" });
    let response = post_json(app.clone(), "/api/users/login", wrong).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid credentials");

    let unknown = serde_json::json!({ "email": "ghost@example.com", "password": PASSWORD });
    let response = post_json(app.clone(), "/api/users/login", unknown).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let admin = create_user(&pool, "admin@example.com", ROLE_ID_ADMIN).await;
    let admin_token = login(app.clone(), "admin@example.com").await["access_token"]
        .as_str()
        .unwrap()
        .to_string();
    let response = put_json_auth(
        app.clone(),
        &format!("/api/admin/users/{}", user.id),
        serde_json::json!({ "is_active": false }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_ne!(admin.id, user.id);

    let right = serde_json::json!({ "email": "member@example.com", "password": PASSWORD });
    let response = post_json(app, "/api/users/login", right).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn refresh_rotates_and_logout_revokes(pool: PgPool) {
    create_user(&pool, "rotate@example.com", ROLE_ID_USER).await;
    let app = common::build_test_app(pool);

    let first = login(app.clone(), "rotate@example.com").await;
    let refresh_token = first["refresh_token"].as_str().unwrap();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_ne!(second["refresh_token"], first["refresh_token"]);

    // The old token was revoked by the rotation.
    let response = post_json(app.clone(), "/api/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let access = second["access_token"].as_str().unwrap();
    let response = post_json_auth(app.clone(), "/api/auth/logout", serde_json::json!({}), access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": second["refresh_token"] });
    let response = post_json(app, "/api/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn profile_round_trips_json_updates(pool: PgPool) {
    create_user(&pool, "profile@example.com", ROLE_ID_USER).await;
    let app = common::build_test_app(pool);
    let token = login(app.clone(), "profile@example.com").await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let update = serde_json::json!({
        "age": 31,
        "height_cm": 172.5,
        "fitness_goals": ["strength", "mobility"],
    });
    let response = put_json_auth(app.clone(), "/api/users/update-fields", update, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(app, "/api/users/profile", &token).await).await;
    assert_eq!(json["data"]["age"], 31);
    assert_eq!(json["data"]["height_cm"], 172.5);
    assert_eq!(
        json["data"]["fitness_goals"],
        serde_json::json!(["strength", "mobility"])
    );
    assert_eq!(json["data"]["image_url"], DEFAULT_PROFILE_IMAGE);
}
