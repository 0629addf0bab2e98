use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    services::session,
    state::AppState,
};

/// The fallback header for clients that cannot set `Authorization`.
const SESSION_HEADER: &str = "x-session-id";

/// The authenticated user attached to the request extensions after a
/// successful session check. Handlers read it back with the
/// `Extension<AuthUser>` extractor, which rejects the request (rather
/// than panicking) if the middleware did not run.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

/// The raw session id the request authenticated with. Logout uses it to
/// revoke the exact credential it was called with.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Extracts the session id from the request headers.
///
/// It accepts any of the following:
///
///   - Authorization: Bearer <id>  (case-insensitive prefix)
///   - Authorization: <id>         (no "Bearer" word)
///   - X-Session-ID: <id>
///
/// # Arguments
///
/// * `req` - The incoming request.
///
/// # Returns
///
/// An `Option` containing the session id if found.
fn extract_session_token(req: &Request<Body>) -> Option<String> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim_start)
        .unwrap_or_default();

    let mut sid = if auth.len() >= 7 && auth[..7].eq_ignore_ascii_case("bearer ") {
        auth[7..].trim()
    } else {
        auth.trim_end()
    };

    if sid.is_empty() {
        sid = req
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();
    }

    (!sid.is_empty()).then(|| sid.to_string())
}

/// A middleware that requires a valid session to be present.
///
/// An absent credential is rejected before any store access. A store
/// failure maps to 500; everything else that is not a valid session
/// maps uniformly to 401.
pub async fn require_auth(
    State(mut state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    tracing::debug!("🔐 Checking authentication...");

    let sid = extract_session_token(&request).ok_or_else(|| {
        tracing::warn!("❌ No session credential in request");
        StatusCode::UNAUTHORIZED
    })?;

    let user_id = session::validate_session(&mut state.redis, &sid)
        .await
        .map_err(|e| {
            tracing::error!("❌ Session lookup failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            tracing::warn!("❌ Invalid or revoked session");
            StatusCode::UNAUTHORIZED
        })?;

    tracing::debug!("✅ User authenticated: {}", user_id);

    request.extensions_mut().insert(AuthUser(user_id));
    request.extensions_mut().insert(SessionToken(sid));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_headers(headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/stream-key");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_prefix_is_stripped_case_insensitively() {
        let req = request_with_headers(&[("Authorization", "Bearer abc123")]);
        assert_eq!(extract_session_token(&req).as_deref(), Some("abc123"));

        let req = request_with_headers(&[("Authorization", "bEaReR abc123")]);
        assert_eq!(extract_session_token(&req).as_deref(), Some("abc123"));
    }

    #[test]
    fn bare_authorization_header_is_used_verbatim() {
        let req = request_with_headers(&[("Authorization", "  abc123  ")]);
        assert_eq!(extract_session_token(&req).as_deref(), Some("abc123"));
    }

    #[test]
    fn custom_header_is_the_fallback() {
        let req = request_with_headers(&[("X-Session-ID", "abc123")]);
        assert_eq!(extract_session_token(&req).as_deref(), Some("abc123"));

        // Authorization wins when both are present.
        let req = request_with_headers(&[
            ("Authorization", "Bearer first"),
            ("X-Session-ID", "second"),
        ]);
        assert_eq!(extract_session_token(&req).as_deref(), Some("first"));
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let req = request_with_headers(&[]);
        assert_eq!(extract_session_token(&req), None);

        let req = request_with_headers(&[("Authorization", "Bearer ")]);
        assert_eq!(extract_session_token(&req), None);

        let req = request_with_headers(&[("Authorization", "   ")]);
        assert_eq!(extract_session_token(&req), None);
    }
}
