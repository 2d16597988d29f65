//! Provider redirect target for email links and hosted flows.

use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::error;

use crate::gateway::{now_unix_seconds, CallbackParams, CredentialGateway};

use super::bad_request_response;
use super::cookie::session_cookie;
use super::types::CallbackResponse;

#[utoipa::path(
    get,
    path = "/auth/callback",
    params(CallbackParams),
    responses(
        (status = 200, description = "Session established; cookie set", body = CallbackResponse),
        (status = 400, description = "Redirect carried an error or no credentials", body = String)
    ),
    tag = "auth"
)]
pub async fn callback(
    gateway: Extension<Arc<CredentialGateway>>,
    query: Option<Query<CallbackParams>>,
) -> impl IntoResponse {
    let params = query.map(|Query(params)| params).unwrap_or_default();

    let result = match gateway.callback(params).await {
        Ok(result) => result,
        Err(err) => return bad_request_response(&err, "Authentication failed").into_response(),
    };

    let mut headers = HeaderMap::new();
    if let Some(session) = &result.session {
        match session_cookie(session, now_unix_seconds()) {
            Ok(cookie) => {
                headers.insert(SET_COOKIE, cookie);
            }
            Err(err) => error!("Failed to build session cookie: {err}"),
        }
    }

    let response = CallbackResponse {
        session: result.session,
        message: result.message,
    };
    (StatusCode::OK, headers, Json(response)).into_response()
}
