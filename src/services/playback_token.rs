use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// The fixed lifetime of a playback token. Not configurable per call.
const TOKEN_TTL_MINUTES: i64 = 15;

/// The claims carried by a playback token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user the token was issued to.
    pub sub: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues a signed playback token for the user, valid for 15 minutes.
///
/// # Arguments
///
/// * `secret` - The shared signing secret.
/// * `user_id` - The user the token is bound to.
///
/// # Returns
///
/// A `Result` containing the encoded token.
pub fn issue(secret: &str, user_id: Uuid) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Token(format!("Failed to sign playback token: {}", e)))
}

/// Verifies a playback token, returning the user it was issued to.
///
/// Signature integrity is checked before expiry; a wrong algorithm, a
/// bad MAC, an elapsed `exp`, and a garbled token all collapse to
/// `None`. There is no revocation list: a leaked token stays valid
/// until natural expiry.
pub fn verify(secret: &str, token: &str) -> Option<Uuid> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()?;

    Uuid::parse_str(&data.claims.sub).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_token_verifies_to_the_same_user() {
        let user_id = Uuid::new_v4();
        let token = issue(SECRET, user_id).unwrap();
        assert_eq!(verify(SECRET, &token), Some(user_id));
    }

    #[test]
    fn wrong_secret_never_verifies() {
        let token = issue(SECRET, Uuid::new_v4()).unwrap();
        assert_eq!(verify("another-secret-another-secret!!", &token), None);
    }

    #[test]
    fn tampered_token_never_verifies() {
        let token = issue(SECRET, Uuid::new_v4()).unwrap();
        let tampered = format!("{}x", token);
        assert_eq!(verify(SECRET, &tampered), None);
    }

    #[test]
    fn expired_token_never_verifies() {
        let past = Utc::now() - Duration::minutes(30);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(15)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(verify(SECRET, &token), None);
    }

    #[test]
    fn garbage_never_verifies() {
        assert_eq!(verify(SECRET, ""), None);
        assert_eq!(verify(SECRET, "not.a.token"), None);
    }
}
