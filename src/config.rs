use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

use crate::crypto::hash::HashParams;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The port the HTTP server binds to.
    pub port: u16,
    /// The shared secret used to sign playback tokens.
    pub playback_token_secret: Zeroizing<String>,
    /// Optional TTL applied to session records at creation time. `None`
    /// means sessions live until explicitly revoked.
    pub session_ttl_secs: Option<u64>,
    /// Upper bound on the stream-key validation scan, in seconds.
    pub validate_deadline_secs: u64,
    /// Argon2 memory cost in MiB.
    pub argon2_memory_mib: u32,
    /// Argon2 iteration count.
    pub argon2_iterations: u32,
    /// Argon2 parallelism factor.
    pub argon2_parallelism: u32,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let playback_token_secret = env::var("PLAYBACK_TOKEN_SECRET")
            .context("PLAYBACK_TOKEN_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if playback_token_secret.len() < 32 {
            anyhow::bail!("PLAYBACK_TOKEN_SECRET must be at least 32 characters");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,
            playback_token_secret: Zeroizing::new(playback_token_secret),
            session_ttl_secs: match env::var("SESSION_TTL_SECS") {
                Ok(v) => Some(v.parse().context("Invalid SESSION_TTL_SECS")?),
                Err(_) => None,
            },
            validate_deadline_secs: env::var("VALIDATE_DEADLINE_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid VALIDATE_DEADLINE_SECS")?,
            argon2_memory_mib: env::var("ARGON2_MEMORY_MIB")
                .unwrap_or_else(|_| "19".to_string())
                .parse()
                .context("Invalid ARGON2_MEMORY_MIB")?,
            argon2_iterations: env::var("ARGON2_ITERATIONS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("Invalid ARGON2_ITERATIONS")?,
            argon2_parallelism: env::var("ARGON2_PARALLELISM")
                .unwrap_or_else(|_| "6".to_string())
                .parse()
                .context("Invalid ARGON2_PARALLELISM")?,
        })
    }

    /// The Argon2 cost parameters for the secret hasher.
    pub fn hash_params(&self) -> HashParams {
        HashParams {
            memory_mib: self.argon2_memory_mib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}
