use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    services::{playback_token, stream_key as stream_key_service},
    state::AppState,
};

/// The query parameters for a stream-key check.
#[derive(Deserialize)]
pub struct ValidateKeyParams {
    #[serde(default)]
    key: String,
}

/// The query parameters for a playback-token check.
#[derive(Deserialize)]
pub struct ValidateTokenParams {
    #[serde(default)]
    token: String,
}

/// Called by the RTMP ingest server on every publish attempt. Responds
/// with an empty 200 when the presented secret matches an active key,
/// an empty 403 otherwise.
///
/// The hash scan is bounded by the configured deadline; a timeout
/// rejects rather than hangs.
#[axum::debug_handler]
pub async fn validate_key(
    State(state): State<AppState>,
    Query(params): Query<ValidateKeyParams>,
) -> StatusCode {
    let deadline = Duration::from_secs(state.config.validate_deadline_secs);

    let outcome = tokio::time::timeout(
        deadline,
        stream_key_service::validate_secret(&state.db, &params.key),
    )
    .await;

    match outcome {
        Ok(Ok(Some(key))) => {
            tracing::info!("✅ Publish authorized for user: {}", key.user_id);
            StatusCode::OK
        }
        Ok(Ok(None)) => {
            tracing::warn!("❌ Publish rejected: unknown stream key");
            StatusCode::FORBIDDEN
        }
        Ok(Err(e)) => {
            tracing::error!("❌ Stream key validation failed: {}", e);
            StatusCode::FORBIDDEN
        }
        Err(_) => {
            tracing::warn!("❌ Stream key validation timed out after {:?}", deadline);
            StatusCode::FORBIDDEN
        }
    }
}

/// Called by the edge proxy to guard playback URLs. Stateless:
/// signature and expiry only, no store round-trip.
#[axum::debug_handler]
pub async fn validate_token(
    State(state): State<AppState>,
    Query(params): Query<ValidateTokenParams>,
) -> StatusCode {
    match playback_token::verify(
        state.config.playback_token_secret.as_str(),
        &params.token,
    ) {
        Some(user_id) => {
            tracing::debug!("✅ Playback authorized for user: {}", user_id);
            StatusCode::OK
        }
        None => {
            tracing::warn!("❌ Playback rejected: invalid token");
            StatusCode::FORBIDDEN
        }
    }
}
