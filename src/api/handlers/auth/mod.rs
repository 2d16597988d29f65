//! Auth handlers.
//!
//! Each handler extracts its input, hands it to the [`CredentialGateway`] and
//! maps the outcome to a response. Error bodies are plain strings. Only
//! validation details reach the caller; provider details stay in the logs.
//!
//! ## Session cookie
//!
//! Login and callback set an `access_token` cookie (`HttpOnly; Secure;
//! SameSite=Lax`) whose `Max-Age` follows the session expiry. Signout clears
//! it. Session endpoints accept the cookie or an `Authorization: Bearer`
//! header, the header taking precedence.
//!
//! [`CredentialGateway`]: crate::gateway::CredentialGateway

pub(crate) mod callback;
pub(crate) mod cookie;
pub(crate) mod login;
pub(crate) mod password;
pub(crate) mod session;
pub(crate) mod signup;
pub(crate) mod types;
pub(crate) mod verification;

use axum::http::StatusCode;
use tracing::error;

use crate::gateway::{ClassifiedError, ErrorCategory};


/// 400 with the validation detail, or with `fallback` for remote failures.
pub(super) fn bad_request_response(err: &ClassifiedError, fallback: &str) -> (StatusCode, String) {
    if err.category() == ErrorCategory::Validation {
        return (StatusCode::BAD_REQUEST, err.detail().to_string());
    }
    error!("{fallback}: {err}");
    (StatusCode::BAD_REQUEST, fallback.to_string())
}
