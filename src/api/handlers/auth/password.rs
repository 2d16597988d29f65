//! Password recovery: reset email and new password.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::gateway::{CredentialGateway, PasswordResetRequest, PasswordSetRequest};

use super::bad_request_response;
use super::types::MessageResponse;

/// Always answers with the same message for well-formed emails.
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset email requested", body = MessageResponse),
        (status = 400, description = "Malformed email", body = String)
    ),
    tag = "auth"
)]
pub async fn reset_password(
    gateway: Extension<Arc<CredentialGateway>>,
    payload: Option<Json<PasswordResetRequest>>,
) -> impl IntoResponse {
    let request: PasswordResetRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match gateway.request_password_reset(&request).await {
        Ok(message) => (StatusCode::OK, Json(MessageResponse::new(message))).into_response(),
        Err(err) => bad_request_response(&err, "Password reset failed").into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/auth/set-password",
    request_body = PasswordSetRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid token or password", body = String)
    ),
    tag = "auth"
)]
pub async fn set_password(
    gateway: Extension<Arc<CredentialGateway>>,
    payload: Option<Json<PasswordSetRequest>>,
) -> impl IntoResponse {
    let request: PasswordSetRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match gateway.set_password(request).await {
        Ok(message) => (StatusCode::OK, Json(MessageResponse::new(message))).into_response(),
        Err(err) => bad_request_response(&err, "Failed to update password").into_response(),
    }
}
