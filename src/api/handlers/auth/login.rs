//! Password login.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::gateway::{
    now_unix_seconds, ClassifiedError, CredentialGateway, ErrorCategory, LoginRequest,
};

use super::cookie::session_cookie;
use super::types::LoginResponse;

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 400, description = "Invalid input", body = String),
        (status = 401, description = "Invalid credentials", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    gateway: Extension<Arc<CredentialGateway>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let result = match gateway.login(request).await {
        Ok(result) => result,
        Err(err) => {
            let (status, message) = login_error_response(&err);
            return (status, message).into_response();
        }
    };

    let mut headers = HeaderMap::new();
    if let Some(session) = &result.session {
        match session_cookie(session, now_unix_seconds()) {
            Ok(cookie) => {
                headers.insert(SET_COOKIE, cookie);
            }
            Err(err) => error!("Failed to build session cookie: {err}"),
        }
    } else {
        warn!("Login succeeded without a session");
    }

    let response = LoginResponse {
        user: result.user,
        message: result.message,
    };
    (StatusCode::OK, headers, Json(response)).into_response()
}

pub(super) fn login_error_response(err: &ClassifiedError) -> (StatusCode, String) {
    match err.category() {
        ErrorCategory::Validation => (StatusCode::BAD_REQUEST, err.detail().to_string()),
        ErrorCategory::AuthFailed => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()),
        _ => {
            error!("Login failed: {err}");
            (
                StatusCode::UNAUTHORIZED,
                "Authentication failed. Please check your credentials.".to_string(),
            )
        }
    }
}
