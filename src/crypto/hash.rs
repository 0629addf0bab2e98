use crate::error::{AppError, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

/// Argon2 cost parameters, injected from configuration. The same
/// hasher covers account passwords and stream-key secrets.
#[derive(Clone, Copy, Debug)]
pub struct HashParams {
    /// Memory cost in MiB.
    pub memory_mib: u32,
    /// Iteration count.
    pub iterations: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_mib: 19,
            iterations: 3,
            parallelism: 6,
        }
    }
}

/// Hashes a secret using Argon2id with a per-call random salt. Two
/// hashes of the same input never compare equal.
///
/// # Arguments
///
/// * `secret` - The secret to hash.
/// * `params` - The Argon2 cost parameters.
///
/// # Returns
///
/// A `Result` containing the PHC-encoded digest.
pub fn hash_secret(secret: &str, params: &HashParams) -> Result<String> {
    let mut secret_bytes = secret.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AppError::Hashing(format!("Failed to generate salt: {}", e)))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Hashing(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(params.memory_mib * 1024)
            .t_cost(params.iterations)
            .p_cost(params.parallelism)
            .build()
            .map_err(|e| AppError::Hashing(format!("Argon2 params: {}", e)))?,
    );

    let digest = argon2
        .hash_password(&secret_bytes, &salt)
        .map_err(|e| AppError::Hashing(format!("Argon2 hash error: {}", e)))?
        .to_string();

    secret_bytes.zeroize();
    Ok(digest)
}

/// Verifies a secret against a stored digest. The cost parameters are
/// read back from the digest itself.
///
/// # Arguments
///
/// * `secret` - The secret to verify.
/// * `digest` - The PHC-encoded digest to verify against.
///
/// # Returns
///
/// A `Result` containing `true` if the secret matches.
pub fn verify_secret(secret: &str, digest: &str) -> Result<bool> {
    let mut secret_bytes = secret.as_bytes().to_vec();
    let parsed_digest = PasswordHash::new(digest)
        .map_err(|e| AppError::Hashing(format!("Digest parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&secret_bytes, &parsed_digest)
        .is_ok();

    secret_bytes.zeroize();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> HashParams {
        // Low cost keeps the suite fast; verification reads the cost
        // back from the digest either way.
        HashParams {
            memory_mib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn hashes_of_the_same_secret_differ() {
        let params = test_params();
        let first = hash_secret("correct horse battery", &params).unwrap();
        let second = hash_secret("correct horse battery", &params).unwrap();

        assert_ne!(first, second);
        assert!(verify_secret("correct horse battery", &first).unwrap());
        assert!(verify_secret("correct horse battery", &second).unwrap());
    }

    #[test]
    fn wrong_secret_does_not_verify() {
        let digest = hash_secret("correct horse battery", &test_params()).unwrap();
        assert!(!verify_secret("wrong horse", &digest).unwrap());
        assert!(!verify_secret("", &digest).unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error() {
        assert!(verify_secret("anything", "not-a-phc-string").is_err());
    }
}
