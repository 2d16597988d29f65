//! Account signup.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::error;

use crate::gateway::{AuthResult, ClassifiedError, CredentialGateway, ErrorCategory, SignupRequest};

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created; confirmation email sent", body = AuthResult),
        (status = 400, description = "Invalid input, email taken, or signup refused", body = String)
    ),
    tag = "auth"
)]
pub async fn signup(
    gateway: Extension<Arc<CredentialGateway>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    match gateway.signup(request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => signup_error_response(&err).into_response(),
    }
}

pub(super) fn signup_error_response(err: &ClassifiedError) -> (StatusCode, String) {
    let message = match err.category() {
        ErrorCategory::Validation => err.detail().to_string(),
        ErrorCategory::DuplicateAccount => "Email already registered".to_string(),
        _ => {
            error!("Signup failed: {err}");
            "Signup failed. Please try again.".to_string()
        }
    };
    (StatusCode::BAD_REQUEST, message)
}
