//! Request and result types for gateway operations.
//!
//! Request types double as HTTP bodies/queries. Their `Debug` output redacts
//! passwords and tokens so they can be traced safely.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};

use crate::provider::UserMap;

#[derive(ToSchema, Deserialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Deserialize, Clone)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .field("password_confirmation", &"***")
            .finish()
    }
}

#[derive(ToSchema, Deserialize, Debug, Clone)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// `token` is either the account UUID or an access token (JWT) from a
/// password recovery link, possibly with a trailing `#...` fragment.
#[derive(ToSchema, Deserialize, Clone)]
pub struct PasswordSetRequest {
    pub token: String,
    pub new_password: String,
}

impl fmt::Debug for PasswordSetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordSetRequest")
            .field("token", &"***")
            .field("new_password", &"***")
            .finish()
    }
}

#[derive(IntoParams, Deserialize, Clone)]
#[into_params(parameter_in = Query)]
pub struct VerifyRequest {
    /// Token hash from the verification email link.
    pub token: String,
    /// Verification kind (`email`, `signup`, `recovery`, ...); defaults to `email`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl fmt::Debug for VerifyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyRequest")
            .field("token", &"***")
            .field("kind", &self.kind)
            .finish()
    }
}

/// Access token to check, passed as a query parameter.
#[derive(IntoParams, Deserialize, Clone)]
#[into_params(parameter_in = Query)]
pub struct TokenQuery {
    pub token: String,
}

impl fmt::Debug for TokenQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenQuery").field("token", &"***").finish()
    }
}

/// Query parameters the provider appends when redirecting back to us.
#[derive(IntoParams, Deserialize, Default, Clone)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
    pub expires_in: Option<i64>,
    pub token_hash: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl fmt::Debug for CallbackParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackParams")
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expires_at", &self.expires_at)
            .field("expires_in", &self.expires_in)
            .field("token_hash", &self.token_hash.as_ref().map(|_| "***"))
            .field("kind", &self.kind)
            .field("error", &self.error)
            .field("error_description", &self.error_description)
            .finish()
    }
}

/// Session in the fixed local shape; other provider fields are dropped.
#[derive(ToSchema, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds).
    pub expires_at: i64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(ToSchema, Serialize, Debug, Clone, PartialEq)]
pub struct AuthResult {
    #[schema(value_type = Object)]
    pub user: UserMap,
    pub session: Option<Session>,
    pub message: String,
}
