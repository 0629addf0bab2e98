use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::crypto::hash::{self, HashParams};
use crate::crypto::token;
use crate::error::Result;
use crate::models::stream_key::StreamKey;
use crate::repositories::stream_key as stream_key_repo;

/// Returns the user's current key, creating one if none exists.
///
/// The plaintext generated on the create path is dropped after hashing:
/// a secret is only ever handed out by `rotate`.
pub async fn get_or_create(db: &Pool, params: &HashParams, user_id: Uuid) -> Result<StreamKey> {
    if let Some(key) = stream_key_repo::find_active_by_user(db, &user_id).await? {
        return Ok(key);
    }

    let (_plaintext, key) = generate(db, params, user_id).await?;
    Ok(key)
}

/// Generates a fresh secret for the user: draws 192 bits of randomness,
/// persists only the Argon2 hash, and returns the plaintext exactly
/// once. The plaintext is never stored or logged.
pub async fn generate(
    db: &Pool,
    params: &HashParams,
    user_id: Uuid,
) -> Result<(String, StreamKey)> {
    let plaintext = token::generate_token(token::STREAM_SECRET_SIZE)?;
    let key_hash = hash::hash_secret(&plaintext, params)?;

    let key = stream_key_repo::insert(db, &user_id, &key_hash).await?;

    tracing::info!("✅ Stream key created: {} (user {})", key.id, user_id);
    Ok((plaintext, key))
}

/// Rotates the user's key: revokes any active key, then generates a
/// replacement. The two store calls are not transactional; if the
/// insert fails after revocation the user is left keyless rather than
/// holding two live secrets.
pub async fn rotate(db: &Pool, params: &HashParams, user_id: Uuid) -> Result<(String, StreamKey)> {
    let revoked = stream_key_repo::revoke_by_user(db, &user_id).await?;
    if revoked > 0 {
        tracing::info!("🔁 Revoked {} stream key(s) for user {}", revoked, user_id);
    }

    generate(db, params, user_id).await
}

/// Resolves a presented plaintext secret to its owning key record.
///
/// The hash is salted, so there is nothing to look up by equality:
/// every non-revoked key is tested in turn until one verifies or the
/// set is exhausted. Linear in the active-key population, and the
/// ingest caller presents no identity hint to narrow it. Revoked keys
/// never match because they are filtered out of the candidate set.
pub async fn validate_secret(db: &Pool, plaintext: &str) -> Result<Option<StreamKey>> {
    if plaintext.is_empty() {
        return Ok(None);
    }

    let candidates = stream_key_repo::find_all_active(db).await?;

    for key in candidates {
        match hash::verify_secret(plaintext, &key.key_hash) {
            Ok(true) => {
                tracing::debug!("✅ Stream key matched: {}", key.id);
                return Ok(Some(key));
            }
            Ok(false) => {}
            Err(e) => {
                // A corrupt digest must not block the rest of the scan.
                tracing::warn!("Skipping unreadable hash for key {}: {}", key.id, e);
            }
        }
    }

    Ok(None)
}
