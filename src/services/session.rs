use chrono::Utc;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use crate::crypto::token;
use crate::error::{AppError, Result};
use crate::models::session::Session;

/// Builds the Redis key for a session id.
fn session_key(sid: &str) -> String {
    format!("session:{}", sid)
}

/// Creates a new session for the given user and returns its opaque id.
///
/// The id carries 256 bits of entropy; collisions are treated as
/// impossible. When `session_ttl_secs` is set the record is written
/// with that TTL as the store-level expiry sweep, otherwise it lives
/// until explicitly revoked.
pub async fn create_session(
    redis: &mut ConnectionManager,
    session_ttl_secs: Option<u64>,
    user_id: Uuid,
) -> Result<String> {
    let sid = token::generate_token(token::SESSION_ID_SIZE)?;

    let session = Session {
        user_id,
        created_at: Utc::now(),
    };

    let session_json = sonic_rs::to_string(&session)
        .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

    match session_ttl_secs {
        Some(ttl) => {
            let _: () = redis.set_ex(session_key(&sid), &session_json, ttl).await?;
        }
        None => {
            let _: () = redis.set(session_key(&sid), &session_json).await?;
        }
    }

    tracing::debug!("🔑 Session created for user: {}", user_id);
    Ok(sid)
}

/// Validates a session id, returning the owning user.
///
/// Empty, malformed, and unknown ids all come back as `None`; the
/// caller can never tell which it was.
pub async fn validate_session(
    redis: &mut ConnectionManager,
    sid: &str,
) -> Result<Option<Uuid>> {
    if sid.is_empty() {
        return Ok(None);
    }

    let session_json: Option<String> = redis.get(session_key(sid)).await?;
    let Some(session_json) = session_json else {
        return Ok(None);
    };

    match sonic_rs::from_str::<Session>(&session_json) {
        Ok(session) => Ok(Some(session.user_id)),
        Err(e) => {
            tracing::warn!("Unreadable session record: {}", e);
            Ok(None)
        }
    }
}

/// Revokes a session. Revoking an unknown id is not an error.
pub async fn revoke_session(redis: &mut ConnectionManager, sid: &str) -> Result<()> {
    let _: () = redis.del(session_key(sid)).await?;
    Ok(())
}
