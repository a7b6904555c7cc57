//! Admin-only flows over HTTP: announcements, trainer accounts and the
//! image repair job.
//!
//! Every test here needs PostgreSQL and is `#[ignore]`d unless run with
//! `cargo test -- --ignored`.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    account_with_token, body_json, delete_auth, get, get_auth, multipart_body, post_json,
    post_json_auth, put_json_auth, send_multipart, token_for, FilePart, TINY_PNG,
};
use fittrack_core::images::DEFAULT_PROFILE_IMAGE;
use fittrack_core::roles::{ROLE_ID_ADMIN, ROLE_ID_USER};
use fittrack_db::models::user::CreateUser;
use fittrack_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

fn png_part(file_name: &str) -> FilePart<'_> {
    FilePart {
        field: "image",
        file_name,
        content_type: "image/png",
        bytes: TINY_PNG,
    }
}

fn entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Announcements
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn announcements_publish_and_retire(pool: PgPool) {
    let (admin, admin_token) = account_with_token(&pool, "boss@example.com", ROLE_ID_ADMIN).await;
    let (_, member_token) = account_with_token(&pool, "reader@example.com", ROLE_ID_USER).await;
    let app = common::build_test_app(pool);

    let body = json!({ "title": " Pool closed ", "content": "Maintenance on Friday" });
    let response = post_json_auth(app.clone(), "/api/admin/announcements", body.clone(), &member_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(app.clone(), "/api/admin/announcements", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["title"], "Pool closed");
    assert_eq!(created["data"]["created_by"], admin.id);

    let draft = json!({ "title": "New classes", "content": "Coming soon", "is_active": false });
    let response = post_json_auth(app.clone(), "/api/admin/announcements", draft, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let public = body_json(get(app.clone(), "/api/announcements").await).await;
    let items = public["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id);

    let all = body_json(get_auth(app.clone(), "/api/admin/announcements", &admin_token).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/admin/announcements/{id}"),
        json!({ "is_active": false }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let public = body_json(get(app.clone(), "/api/announcements").await).await;
    assert!(public["data"].as_array().unwrap().is_empty());

    let uri = format!("/api/admin/announcements/{id}");
    let response = delete_auth(app.clone(), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app, &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Trainer accounts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn trainer_account_lifecycle_with_pictures(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (_, admin_token) = account_with_token(&pool, "gym@example.com", ROLE_ID_ADMIN).await;
    let (_, member_token) = account_with_token(&pool, "nosy@example.com", ROLE_ID_USER).await;
    let app = common::build_test_app_with_uploads(pool, dir.path(), true);

    let body = multipart_body(
        &[
            ("name", "Serena Coach"),
            ("email", "Serena@Example.com"),
            ("password", common::ACCOUNT_PASSWORD),
            ("specialties", "yoga, pilates"),
            ("hourly_rate_cents", "6000"),
        ],
        Some(png_part("serena.png")),
    );
    let response = send_multipart(
        app.clone(),
        Method::POST,
        "/api/admin/trainers",
        body,
        Some(&admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["image"]["strategy"], "local");
    assert_eq!(created["data"]["user"]["role"], "trainer");
    assert_eq!(created["data"]["user"]["email"], "serena@example.com");
    let trainer_id = created["data"]["trainer"]["id"].as_i64().unwrap();
    let user_id = created["data"]["user"]["id"].as_i64().unwrap();
    let first_image = created["data"]["trainer"]["image_url"].as_str().unwrap().to_string();
    assert!(first_image.starts_with("/uploads/"), "unexpected url {first_image}");
    assert_eq!(entries(dir.path()), 1);

    let profile = body_json(get(app.clone(), &format!("/api/trainers/{trainer_id}")).await).await;
    assert_eq!(profile["data"]["name"], "Serena Coach");
    assert_eq!(profile["data"]["specialties"], json!(["yoga", "pilates"]));
    assert_eq!(profile["data"]["hourly_rate_cents"], 6000);
    assert_eq!(profile["data"]["image_url"], first_image.as_str());

    // Only the trainer themself or an admin may edit the profile.
    let uri = format!("/api/trainers/{trainer_id}");
    let body = multipart_body(&[("bio", "Not mine to write")], None);
    let response = send_multipart(app.clone(), Method::PUT, &uri, body, Some(&member_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let trainer_token = token_for(user_id, "trainer");
    let body = multipart_body(
        &[("bio", "Ten years of vinyasa"), ("certifications", r#"["RYT-500"]"#)],
        Some(png_part("serena-new.png")),
    );
    let response = send_multipart(app.clone(), Method::PUT, &uri, body, Some(&trainer_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["image"]["strategy"], "local");
    let second_image = updated["data"]["image_url"].as_str().unwrap().to_string();
    assert_ne!(second_image, first_image);
    assert_eq!(entries(dir.path()), 2);

    let profile = body_json(get(app.clone(), &uri).await).await;
    assert_eq!(profile["data"]["bio"], "Ten years of vinyasa");
    assert_eq!(profile["data"]["certifications"], json!(["RYT-500"]));
    assert_eq!(profile["data"]["image_url"], second_image.as_str());
    assert_eq!(profile["data"]["specialties"], json!(["yoga", "pilates"]));

    let response = delete_auth(app.clone(), &format!("/api/admin/trainers/{trainer_id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The login account went with the profile.
    let login = json!({ "email": "serena@example.com", "password": common::ACCOUNT_PASSWORD });
    let response = post_json(app.clone(), "/api/users/login", login).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete_auth(app, &format!("/api/admin/trainers/{trainer_id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_trainer_email_is_a_conflict(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let (_, admin_token) = account_with_token(&pool, "owner@example.com", ROLE_ID_ADMIN).await;
    account_with_token(&pool, "taken@example.com", ROLE_ID_USER).await;
    let app = common::build_test_app_with_uploads(pool, dir.path(), true);

    let body = multipart_body(
        &[
            ("name", "Taken"),
            ("email", "taken@example.com"),
            ("password", common::ACCOUNT_PASSWORD),
        ],
        Some(png_part("taken.png")),
    );
    let response = send_multipart(app, Method::POST, "/api/admin/trainers", body, Some(&admin_token)).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(entries(dir.path()), 0);
}

// ---------------------------------------------------------------------------
// Image repair
// ---------------------------------------------------------------------------

async fn account_with_image(pool: &PgPool, email: &str, image_url: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Pictured".to_string(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            role_id: ROLE_ID_USER,
            image_url: Some(image_url.to_string()),
        },
    )
    .await
    .expect("account creation should succeed")
    .id
}

async fn stored_image(pool: &PgPool, id: i64) -> Option<String> {
    UserRepo::find_by_id(pool, id)
        .await
        .unwrap()
        .expect("account should exist")
        .image_url
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn repair_resets_only_broken_image_references(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("present.png"), TINY_PNG).unwrap();

    let (_, admin_token) = account_with_token(&pool, "fixer@example.com", ROLE_ID_ADMIN).await;
    let missing = account_with_image(&pool, "missing@example.com", "/uploads/gone.png").await;
    let blank = account_with_image(&pool, "blank@example.com", "  ").await;
    let present = account_with_image(&pool, "present@example.com", "/uploads/present.png").await;
    let remote =
        account_with_image(&pool, "remote@example.com", "https://cdn.example.com/a.png").await;
    let app = common::build_test_app_with_uploads(pool.clone(), dir.path(), true);

    let response = post_json_auth(
        app.clone(),
        "/api/admin/maintenance/repair-images",
        json!({}),
        &token_for(missing, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        "/api/admin/maintenance/repair-images",
        json!({}),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["data"]["users_repaired"], 2);
    assert_eq!(summary["data"]["trainers_repaired"], 0);
    assert_eq!(summary["data"]["total"], 2);

    assert_eq!(stored_image(&pool, missing).await.as_deref(), Some(DEFAULT_PROFILE_IMAGE));
    assert_eq!(stored_image(&pool, blank).await.as_deref(), Some(DEFAULT_PROFILE_IMAGE));
    assert_eq!(
        stored_image(&pool, present).await.as_deref(),
        Some("/uploads/present.png")
    );
    assert_eq!(
        stored_image(&pool, remote).await.as_deref(),
        Some("https://cdn.example.com/a.png")
    );

    // A second run finds nothing left to fix.
    let response = post_json_auth(app, "/api/admin/maintenance/repair-images", json!({}), &admin_token).await;
    assert_eq!(body_json(response).await["data"]["total"], 0);
}
