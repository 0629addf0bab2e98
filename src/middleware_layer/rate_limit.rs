use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::{error::AppError, state::AppState};

/// Extracts the real IP address from the request extensions.
///
/// # Arguments
///
/// * `req` - The incoming request.
///
/// # Returns
///
/// The IP address as a string, or "unknown" if not found.
fn extract_real_ip(req: &Request<Body>) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Bumps the counter behind `key` and fails once it passes
/// `max_attempts` within the window. Counter errors never block the
/// request; the limiter degrades open when Redis is unavailable.
async fn throttle(
    state: &AppState,
    key: String,
    max_attempts: i32,
    window_secs: i64,
) -> Result<(), AppError> {
    let count: Option<i32> = redis::cmd("GET")
        .arg(&key)
        .query_async(&mut state.redis.clone())
        .await
        .unwrap_or(None);

    if let Some(attempts) = count {
        if attempts >= max_attempts {
            let ttl: Option<i32> = redis::cmd("TTL")
                .arg(&key)
                .query_async(&mut state.redis.clone())
                .await
                .unwrap_or(None);

            return Err(AppError::RateLimitExceeded(format!(
                "Too many attempts. Try again in {} minutes",
                ttl.unwrap_or(0).max(0) / 60 + 1
            )));
        }
    }

    let _: () = redis::cmd("INCR")
        .arg(&key)
        .query_async(&mut state.redis.clone())
        .await
        .unwrap_or(());

    let _: () = redis::cmd("EXPIRE")
        .arg(&key)
        .arg(window_secs)
        .query_async(&mut state.redis.clone())
        .await
        .unwrap_or(());

    Ok(())
}

/// A middleware that rate limits user registration per source IP.
pub async fn rate_limit_register(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = extract_real_ip(&req);
    let key = format!("rate_limit:register:{}", ip);

    if let Err(e) = throttle(&state, key, 5, 3600).await {
        return e.into_response();
    }

    next.run(req).await
}

/// A middleware that rate limits login attempts per source IP.
pub async fn rate_limit_login(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = extract_real_ip(&req);
    let key = format!("rate_limit:login:{}", ip);

    if let Err(e) = throttle(&state, key, 10, 900).await {
        return e.into_response();
    }

    next.run(req).await
}
