use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A server-held mapping from an opaque bearer token to a user
/// identity. Stored in Redis under `session:{id}`; the id itself is the
/// Redis key and is never duplicated inside the record.
///
/// Validation never inspects `created_at`. If sessions need to age out,
/// a store-level TTL is applied at creation time instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
}
