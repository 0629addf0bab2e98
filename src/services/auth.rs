use deadpool_postgres::Pool;

use crate::crypto::hash::{self, HashParams};
use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::repositories::user as user_repo;

/// Creates a new user with an Argon2-hashed password.
///
/// # Arguments
///
/// * `db` - The database connection pool.
/// * `params` - The Argon2 cost parameters.
/// * `username`, `first_name`, `last_name`, `email` - Profile fields.
/// * `password` - The plaintext password. Only its hash is persisted.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn create_user(
    db: &Pool,
    params: &HashParams,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
) -> Result<User> {
    tracing::debug!("🔐 Creating user: {}", username);
    let password_hash = hash::hash_secret(&password, params)?;

    let user = user_repo::create_user(
        db,
        &username,
        &first_name,
        &last_name,
        &email,
        &password_hash,
    )
    .await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user by email or username.
///
/// Failure is uniform: an unknown identifier and a wrong password both
/// surface as the same authentication error. The distinguishing detail
/// stays in the server-side log.
pub async fn authenticate_user(
    db: &Pool,
    email_or_username: String,
    password: String,
) -> Result<User> {
    tracing::debug!("🔐 Authenticating user: {}", email_or_username);

    let user = user_repo::find_by_email_or_username(db, &email_or_username)
        .await?
        .ok_or_else(|| AppError::Authentication("unknown identifier".to_string()))?;

    if !hash::verify_secret(&password, &user.password_hash)? {
        return Err(AppError::Authentication("wrong password".to_string()));
    }

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok(user)
}
