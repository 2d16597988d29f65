//! Session cookie and bearer token handling.

use axum::http::{
    header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};

use crate::gateway::Session;

pub(crate) const SESSION_COOKIE_NAME: &str = "access_token";

/// Build a secure `HttpOnly` cookie carrying the access token.
///
/// `Max-Age` is the time left until `expires_at`; an already expired session
/// yields `Max-Age=0`.
pub(crate) fn session_cookie(session: &Session, now: i64) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = session.expires_at.saturating_sub(now).max(0);
    let cookie = format!(
        "{SESSION_COOKIE_NAME}={}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={max_age}",
        session.access_token
    );
    HeaderValue::from_str(&cookie)
}

pub(crate) fn clear_session_cookie() -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0"
    ))
}

/// Access token from the `Authorization` header, falling back to the cookie.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let value = headers.get(COOKIE)?.to_str().ok()?;
    for pair in value.split(';') {
        let Some((key, val)) = pair.split_once('=') else {
            continue;
        };
        let val = val.trim();
        if key.trim() == SESSION_COOKIE_NAME && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
