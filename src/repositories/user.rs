use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::error::SqlState;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        username: row.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
        first_name: row.try_get("first_name").map_err(|_| AppError::MissingData("first_name".to_string()))?,
        last_name: row.try_get("last_name").map_err(|_| AppError::MissingData("last_name".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        password_hash: row.try_get("password_hash").map_err(|_| AppError::MissingData("password_hash".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Maps a unique-constraint violation to a conflict error, leaving
/// every other database failure untouched.
fn map_insert_error(e: tokio_postgres::Error) -> AppError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        AppError::Conflict("Username or email already registered".to_string())
    } else {
        AppError::Database(e)
    }
}

/// Creates a new user in the database.
pub async fn create_user(
    pool: &Pool,
    username: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO users (id, username, first_name, last_name, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
            &[&Uuid::new_v4(), &username, &first_name, &last_name, &email, &password_hash],
        )
        .await
        .map_err(map_insert_error)?;
    row_to_user(&row)
}

/// Finds a user by email or username with a single identifier.
pub async fn find_by_email_or_username(pool: &Pool, identifier: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM users
            WHERE email = $1 OR username = $1
            "#,
            &[&identifier],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}
