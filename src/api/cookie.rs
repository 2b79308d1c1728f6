/// Session cookie handling

use crate::session::SessionId;
use axum::http::{header, HeaderMap, HeaderValue};
use uuid::Uuid;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "n8n_tools_session";

/// Extract the session id from the request's `Cookie` headers.
///
/// Malformed values are ignored so the caller starts a fresh session.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value handing a session id to the browser
pub fn session_cookie(id: &SessionId) -> HeaderValue {
    // A hyphenated UUID is always a valid header value
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("n8n_tools_session=; Path=/"))
}

/// `Set-Cookie` value expiring the session cookie
pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static("n8n_tools_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
