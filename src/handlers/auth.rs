use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::{AuthUser, SessionToken},
    services::{auth as auth_service, session as session_service},
    state::AppState,
    validation::auth::*,
};

/// The request payload for user registration.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// The response payload for registration.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
}

/// The request payload for user login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email_or_username: String,
    pub password: String,
}

/// The response payload for login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub session_id: String,
    pub user_id: Uuid,
}

/// The response payload for logout.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!("📝 Register attempt: {}", payload.username);
    validate_username(&payload.username)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }

    let user = auth_service::create_user(
        &state.db,
        &state.config.hash_params(),
        payload.username,
        payload.first_name,
        payload.last_name,
        payload.email,
        payload.password,
    )
    .await?;

    tracing::info!("✅ User registered: {}", user.id);

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id: user.id })).into_response())
}

/// Handles user login: validates credentials, creates a session entry
/// and returns the session id.
#[axum::debug_handler]
pub async fn login(
    State(mut state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt: {}", payload.email_or_username);

    let user = auth_service::authenticate_user(
        &state.db,
        payload.email_or_username,
        payload.password,
    )
    .await?;

    let session_id = session_service::create_session(
        &mut state.redis,
        state.config.session_ttl_secs,
        user.id,
    )
    .await?;

    tracing::info!("✅ User logged in: {}", user.id);

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            session_id,
            user_id: user.id,
        }),
    )
        .into_response())
}

/// Handles user logout by revoking the presented session.
#[axum::debug_handler]
pub async fn logout(
    State(mut state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Extension(SessionToken(sid)): Extension<SessionToken>,
) -> Result<Response> {
    tracing::info!("👋 Logout for user: {}", user_id);

    session_service::revoke_session(&mut state.redis, &sid).await?;

    tracing::info!("✅ Session revoked");

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}
