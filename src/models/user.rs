use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Represents a registered user.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's username. Unique across the platform.
    pub username: String,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The user's email address. Unique across the platform.
    pub email: String,
    /// The Argon2 hash of the user's password.
    pub password_hash: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}
