use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::Result,
    middleware_layer::auth::AuthUser,
    services::stream_key as stream_key_service,
    state::AppState,
};

/// The response payload for a stream-key lookup. Only the identifier is
/// disclosed; the secret is not recoverable from the record.
#[derive(Serialize)]
pub struct StreamKeyResponse {
    pub stream_key: Uuid,
}

/// The response payload for a rotation: the new key identifier plus the
/// one-time plaintext secret.
#[derive(Serialize)]
pub struct NewStreamKeyResponse {
    pub stream_key: Uuid,
    pub secret: String,
}

/// Retrieves or creates the stream key for the authenticated user.
#[axum::debug_handler]
pub async fn get_stream_key(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let key = stream_key_service::get_or_create(
        &state.db,
        &state.config.hash_params(),
        user_id,
    )
    .await?;

    Ok(Json(StreamKeyResponse { stream_key: key.id }))
}

/// Rotates the stream key for the authenticated user, replacing any old
/// one, and returns the fresh secret exactly once.
#[axum::debug_handler]
pub async fn new_stream_key(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let (secret, key) = stream_key_service::rotate(
        &state.db,
        &state.config.hash_params(),
        user_id,
    )
    .await?;

    Ok(Json(NewStreamKeyResponse {
        stream_key: key.id,
        secret,
    }))
}
