use crate::error::{AppError, Result};
use rand::{rngs::OsRng, RngCore};
use base64::{Engine as _, engine::general_purpose};

/// The size of a session identifier in bytes (256 bits of entropy).
pub const SESSION_ID_SIZE: usize = 32;

/// The size of a stream-key secret in bytes (192 bits of entropy).
pub const STREAM_SECRET_SIZE: usize = 24;

/// Generates a random opaque token of `size` bytes, encoded as URL-safe
/// base64 without padding.
///
/// # Arguments
///
/// * `size` - The number of random bytes to draw.
///
/// # Returns
///
/// A URL-safe base64-encoded token.
pub fn generate_token(size: usize) -> Result<String> {
    let mut token = vec![0u8; size];
    OsRng
        .try_fill_bytes(&mut token)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe_and_unpadded() {
        let token = generate_token(SESSION_ID_SIZE).unwrap();
        // 32 bytes -> ceil(32 * 4 / 3) characters without padding.
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn consecutive_tokens_differ() {
        let first = generate_token(STREAM_SECRET_SIZE).unwrap();
        let second = generate_token(STREAM_SECRET_SIZE).unwrap();
        assert_ne!(first, second);
    }
}
