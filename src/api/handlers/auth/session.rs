//! Signout and current-user endpoints for cookie and bearer auth.

use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

use crate::gateway::{ClassifiedError, CredentialGateway, ErrorCategory, TokenQuery};

use super::cookie::{clear_session_cookie, extract_session_token};
use super::types::{MessageResponse, TokenStatusResponse};

const NO_ACTIVE_SESSION: &str = "No active session";

#[utoipa::path(
    post,
    path = "/auth/signout",
    responses(
        (status = 200, description = "Session revoked; cookie cleared", body = MessageResponse),
        (status = 400, description = "Sign out failed", body = String),
        (status = 401, description = "No active session", body = String)
    ),
    tag = "auth"
)]
pub async fn signout(
    headers: HeaderMap,
    gateway: Extension<Arc<CredentialGateway>>,
) -> impl IntoResponse {
    let Some(token) = extract_session_token(&headers) else {
        return (StatusCode::UNAUTHORIZED, NO_ACTIVE_SESSION.to_string()).into_response();
    };

    match gateway.signout(&token).await {
        Ok(message) => {
            let mut response_headers = HeaderMap::new();
            if let Ok(cookie) = clear_session_cookie() {
                response_headers.insert(SET_COOKIE, cookie);
            }
            (
                StatusCode::OK,
                response_headers,
                Json(MessageResponse::new(message)),
            )
                .into_response()
        }
        Err(err) => signout_error_response(&err).into_response(),
    }
}

pub(super) fn signout_error_response(err: &ClassifiedError) -> (StatusCode, String) {
    if err.category() == ErrorCategory::AuthFailed {
        return (StatusCode::UNAUTHORIZED, NO_ACTIVE_SESSION.to_string());
    }
    error!("Sign out failed: {err}");
    (StatusCode::BAD_REQUEST, "Sign out failed".to_string())
}

/// Missing credentials are answered with `null` rather than an error.
#[utoipa::path(
    get,
    path = "/auth/user",
    responses(
        (status = 200, description = "User behind the session, or null without one"),
        (status = 401, description = "Token rejected by the identity provider", body = String)
    ),
    tag = "auth"
)]
pub async fn current_user(
    headers: HeaderMap,
    gateway: Extension<Arc<CredentialGateway>>,
) -> impl IntoResponse {
    let Some(token) = extract_session_token(&headers) else {
        return (StatusCode::OK, Json(Value::Null)).into_response();
    };

    match gateway.current_user(&token).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => {
            debug!("Failed to get user info: {err}");
            (
                StatusCode::UNAUTHORIZED,
                "Failed to get user info".to_string(),
            )
                .into_response()
        }
    }
}

/// Check an access token passed in the query string.
#[utoipa::path(
    post,
    path = "/auth/verify-token",
    params(TokenQuery),
    responses(
        (status = 200, description = "Token is valid", body = TokenStatusResponse),
        (status = 400, description = "Missing token", body = String),
        (status = 401, description = "Invalid token", body = String)
    ),
    tag = "auth"
)]
pub async fn verify_token(
    gateway: Extension<Arc<CredentialGateway>>,
    query: Option<Query<TokenQuery>>,
) -> impl IntoResponse {
    let Some(Query(query)) = query else {
        return (StatusCode::BAD_REQUEST, "Missing token".to_string()).into_response();
    };

    match gateway.current_user(&query.token).await {
        Ok(user) => (
            StatusCode::OK,
            Json(TokenStatusResponse { valid: true, user }),
        )
            .into_response(),
        Err(err) => {
            debug!("Token check failed: {err}");
            (StatusCode::UNAUTHORIZED, "Invalid token".to_string()).into_response()
        }
    }
}
