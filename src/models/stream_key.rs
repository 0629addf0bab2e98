use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The secret a broadcaster presents to the RTMP server.
/// Only the Argon2 hash of the secret is persisted; the plaintext is
/// surfaced exactly once, at generation time.
#[derive(Debug, Clone, Serialize)]
pub struct StreamKey {
    /// The unique identifier for the key.
    pub id: Uuid,
    /// The owner of the key.
    pub user_id: Uuid,
    /// The Argon2 hash of the secret. Never marshalled to JSON.
    #[serde(skip_serializing)]
    pub key_hash: String,
    /// Whether the key has been revoked by rotation.
    pub revoked: bool,
    /// The timestamp when the key was created.
    pub created_at: DateTime<Utc>,
}
