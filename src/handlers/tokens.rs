use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Serialize;

use crate::{
    error::Result,
    middleware_layer::auth::AuthUser,
    services::playback_token,
    state::AppState,
};

/// The response payload for a playback token request.
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Issues a short-lived signed playback token for the authenticated
/// user. The edge proxy verifies it without a store round-trip.
#[axum::debug_handler]
pub async fn issue_token(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let token = playback_token::issue(
        state.config.playback_token_secret.as_str(),
        user_id,
    )?;

    tracing::debug!("✅ Playback token issued for user: {}", user_id);

    Ok(Json(TokenResponse { token }))
}
