use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::stream_key::StreamKey,
};

/// A helper function to map a `tokio_postgres::Row` to a `StreamKey`.
fn row_to_stream_key(row: &Row) -> Result<StreamKey> {
    Ok(StreamKey {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        user_id: row.try_get("user_id").map_err(|_| AppError::MissingData("user_id".to_string()))?,
        key_hash: row.try_get("key_hash").map_err(|_| AppError::MissingData("key_hash".to_string()))?,
        revoked: row.try_get("revoked").map_err(|_| AppError::MissingData("revoked".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Inserts a new key (only the hash!).
pub async fn insert(pool: &Pool, user_id: &Uuid, key_hash: &str) -> Result<StreamKey> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO stream_keys (id, user_id, key_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
            &[&Uuid::new_v4(), user_id, &key_hash],
        )
        .await?;
    row_to_stream_key(&row)
}

/// Finds the user's active (non-revoked) key, if any. Rotation keeps at
/// most one per user, the newest wins if the invariant is ever broken.
pub async fn find_active_by_user(pool: &Pool, user_id: &Uuid) -> Result<Option<StreamKey>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM stream_keys
            WHERE user_id = $1 AND revoked = false
            ORDER BY created_at DESC
            LIMIT 1
            "#,
            &[user_id],
        )
        .await?;
    row.map(|r| row_to_stream_key(&r)).transpose()
}

/// Returns every non-revoked key across all users. The salted hash
/// cannot be queried by equality, so secret validation has to test each
/// candidate row in turn.
pub async fn find_all_active(pool: &Pool) -> Result<Vec<StreamKey>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM stream_keys
            WHERE revoked = false
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_stream_key).collect()
}

/// Marks every active key for the user as revoked, returning how many
/// were affected.
pub async fn revoke_by_user(pool: &Pool, user_id: &Uuid) -> Result<u64> {
    let client = pool.get().await?;
    let revoked = client
        .execute(
            r#"
            UPDATE stream_keys
            SET revoked = true
            WHERE user_id = $1 AND revoked = false
            "#,
            &[user_id],
        )
        .await?;
    Ok(revoked)
}
