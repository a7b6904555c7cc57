//! Health endpoints and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, send};
use sqlx::PgPool;

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn api_health_lists_upload_tiers() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["image_host_configured"], false);
    assert_eq!(json["payments_configured"], false);
    assert_eq!(
        json["image_stores"],
        serde_json::json!(["cloudinary", "local", "inline"])
    );
}

#[tokio::test]
async fn disabled_local_tier_is_not_listed() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_uploads(common::lazy_pool(), dir.path(), false);
    let json = body_json(get(app, "/api/health").await).await;

    assert_eq!(json["image_stores"], serde_json::json!(["cloudinary", "inline"]));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn cors_preflight_allows_dev_origin() {
    let app = common::build_test_app(common::lazy_pool());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/trainers")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .unwrap();

    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn local_uploads_are_served_statically() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("avatar.png"), common::TINY_PNG).unwrap();
    let app = common::build_test_app_with_uploads(common::lazy_pool(), dir.path(), true);

    let response = get(app, "/uploads/avatar.png").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn health_is_ok_with_database(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/health").await).await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
