//! Registration, login and token rotation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use fittrack_core::error::CoreError;
use fittrack_core::images::DEFAULT_PROFILE_IMAGE;
use fittrack_core::roles::ROLE_ID_USER;
use fittrack_core::validation::{normalize_email, require_non_blank, validate_email};
use fittrack_db::models::session::CreateSession;
use fittrack_db::models::user::{CreateUser, User, UserResponse};
use fittrack_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use fittrack_media::ResolvedImage;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::handlers::notification::notify;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::upload::{commit_with_image, ImageForm};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
    /// How the profile picture was stored, when one was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ResolvedImage>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users/register
///
/// Multipart or JSON. An uploaded picture goes through the image fallback
/// chain; without one the account gets the default profile image.
pub async fn register(
    State(state): State<AppState>,
    mut form: ImageForm<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    require_non_blank("name", &form.fields.name)?;
    let email = normalize_email(&form.fields.email);
    validate_email(&email)?;
    validate_password_strength(&form.fields.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "User already exists".into(),
        )));
    }

    let password_hash = hash_password(&form.fields.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let image = form.resolve_image(&state.media).await?;
    let input = CreateUser {
        name: form.fields.name.trim().to_string(),
        email,
        password_hash,
        role_id: ROLE_ID_USER,
        image_url: Some(
            image
                .as_ref()
                .map_or_else(|| DEFAULT_PROFILE_IMAGE.to_string(), |i| i.url.clone()),
        ),
    };
    let user = commit_with_image(
        &state.media,
        image.as_ref(),
        UserRepo::create(&state.pool, &input),
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        image_strategy = image.as_ref().map(|i| i.strategy),
        "User registered"
    );

    notify(
        &state,
        user.id,
        "Welcome to FitTrack",
        "Your account is ready. Book a trainer or set your first goal to get started.",
    )
    .await;

    let mut response = create_auth_response(&state, user).await?;
    response.image = image;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    UserRepo::record_login(&state.pool, user.id).await?;
    Ok(Json(create_auth_response(&state, user).await?))
}

/// POST /api/auth/refresh
///
/// Exchange a refresh token for a new pair. The old session is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);
    let session = SessionRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    Ok(Json(create_auth_response(&state, user).await?))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, revoked, "Sessions revoked");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue tokens, persist the refresh session and build the response.
async fn create_auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    let access_token = generate_access_token(user.id, &role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_token, refresh_token_hash) = generate_refresh_token();
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash,
            expires_at: Utc::now()
                + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_token_expiry_secs(),
        user: UserResponse::from_user(user, role),
        image: None,
    })
}
