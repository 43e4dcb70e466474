//! Session layer: resolves the caller's session id, touches the session row,
//! and echoes the id back on the response.

use std::net::SocketAddr;

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

/// Longest caller-supplied session id accepted before a fresh one is minted.
const MAX_SESSION_ID_LEN: usize = 128;

/// The session id attached to the current request by [`track_session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        SessionId(format!("session_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Takes the caller's id when it is usable as a header value, otherwise mints one.
    fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= MAX_SESSION_ID_LEN)
            .map(|v| SessionId(v.to_string()))
            .unwrap_or_else(SessionId::generate)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    /// Falls back to the raw header when the middleware did not run.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .unwrap_or_else(|| SessionId::from_headers(&parts.headers)))
    }
}

/// Middleware run on every API request.
///
/// A failed session write is logged and otherwise ignored: analytics never
/// block the request.
pub async fn track_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = SessionId::from_headers(request.headers());
    let ip = client_ip(&request);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Err(e) = state
        .store
        .touch_session(session.as_str(), ip.as_deref(), user_agent.as_deref())
        .await
    {
        warn!("Failed to record session {}: {e}", session.as_str());
    }

    request.extensions_mut().insert(session.clone());
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(session.as_str()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

/// First hop of `X-Forwarded-For`, else the peer address when the server
/// was started with connect info.
fn client_ip(request: &Request) -> Option<String> {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert!(a.as_str().starts_with("session_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_headers_prefers_caller_id() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static("session_abc"));
        assert_eq!(SessionId::from_headers(&headers).as_str(), "session_abc");
    }

    #[test]
    fn test_from_headers_replaces_blank_or_oversized_ids() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static("   "));
        assert!(SessionId::from_headers(&headers).as_str().starts_with("session_"));

        let long = "x".repeat(MAX_SESSION_ID_LEN + 1);
        headers.insert(SESSION_HEADER, HeaderValue::from_str(&long).unwrap());
        assert_ne!(SessionId::from_headers(&headers).as_str(), long);
    }

    #[test]
    fn test_client_ip_uses_first_forwarded_hop() {
        let request = axum::http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_client_ip_absent_without_headers_or_connect_info() {
        let request = axum::http::Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(client_ip(&request), None);
    }
}
