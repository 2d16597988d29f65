//! Credential gateway.
//!
//! Every operation follows the same path: local validation, a provider call
//! signed with the credential the operation is bound to, then normalization of
//! the answer or classification of the failure.

mod classify;
mod error;
mod normalize;
pub mod types;
mod validate;


pub use classify::{category_for_message, classify};
pub use error::{ClassifiedError, ErrorCategory};
pub use normalize::normalize;
pub(crate) use normalize::now_unix_seconds;
pub use types::{
    AuthResult, CallbackParams, LoginRequest, PasswordResetRequest, PasswordSetRequest, Session,
    SignupRequest, TokenQuery, VerifyRequest,
};
pub use validate::{parse_reset_token, valid_email, ResetTarget, Validated, MIN_PASSWORD_LENGTH};

use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::provider::{CredentialMode, IdentityProvider, ProviderError, ProviderSession, UserMap};
use validate::CallbackFlow;

pub const LOGIN_MESSAGE: &str = "Login successful";
pub const SIGNUP_MESSAGE: &str = "Signup successful. Please check your email for verification.";
pub const SIGNOUT_MESSAGE: &str = "Signed out successfully";
pub const PASSWORD_RESET_MESSAGE: &str =
    "If an account exists for this email, a password reset link has been sent.";
pub const PASSWORD_SET_MESSAGE: &str = "Password updated successfully";
pub const VERIFY_MESSAGE: &str = "Email verified successfully";
pub const CALLBACK_MESSAGE: &str = "Authentication successful";

const INVALID_RESET_TOKEN: &str = "Invalid or expired password reset token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Signup,
    /// Self-service signup, used only when admin provisioning is refused.
    SignupSelfService,
    Signout,
    SessionLookup,
    PasswordResetEmail,
    PasswordSet,
    ListUsers,
    VerifyEmail,
    Callback,
}

impl Operation {
    /// Credential an operation is always signed with.
    #[must_use]
    pub const fn mode(self) -> CredentialMode {
        match self {
            Self::Signup | Self::PasswordSet | Self::ListUsers => CredentialMode::Elevated,
            Self::Login
            | Self::SignupSelfService
            | Self::Signout
            | Self::SessionLookup
            | Self::PasswordResetEmail
            | Self::VerifyEmail
            | Self::Callback => CredentialMode::Restricted,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::SignupSelfService => "signup_self_service",
            Self::Signout => "signout",
            Self::SessionLookup => "session_lookup",
            Self::PasswordResetEmail => "password_reset_email",
            Self::PasswordSet => "password_set",
            Self::ListUsers => "list_users",
            Self::VerifyEmail => "verify_email",
            Self::Callback => "callback",
        }
    }
}

#[derive(Clone)]
pub struct CredentialGateway {
    restricted: Arc<dyn IdentityProvider>,
    elevated: Arc<dyn IdentityProvider>,
    redirect_url: Option<String>,
}

impl fmt::Debug for CredentialGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialGateway")
            .field("restricted", &self.restricted.mode())
            .field("elevated", &self.elevated.mode())
            .field("redirect_url", &self.redirect_url)
            .finish()
    }
}

impl CredentialGateway {
    #[must_use]
    pub fn new(restricted: Arc<dyn IdentityProvider>, elevated: Arc<dyn IdentityProvider>) -> Self {
        Self {
            restricted,
            elevated,
            redirect_url: None,
        }
    }

    /// Where signup confirmation and password reset emails send the user.
    #[must_use]
    pub fn with_redirect_url(mut self, redirect_url: Option<String>) -> Self {
        self.redirect_url = redirect_url;
        self
    }

    fn provider(&self, operation: Operation) -> &dyn IdentityProvider {
        match operation.mode() {
            CredentialMode::Restricted => self.restricted.as_ref(),
            CredentialMode::Elevated => self.elevated.as_ref(),
        }
    }

    /// # Errors
    /// `Validation` on bad input, `AuthFailed` when no identity comes back, and
    /// the classified provider failure otherwise.
    #[instrument(skip_all, fields(operation = Operation::Login.as_str()))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResult, ClassifiedError> {
        let request = validate::login(request)?;
        let response = self
            .provider(Operation::Login)
            .sign_in_with_password(&request.email, &request.password)
            .await
            .map_err(|err| classify(&err))?;
        normalize(response, LOGIN_MESSAGE)
    }

    /// Provision an account with the elevated credential.
    ///
    /// If the provider refuses the elevated call as `PrivilegeDenied`, a single
    /// self-service signup is attempted with the restricted credential. Its
    /// outcome is final.
    ///
    /// # Errors
    /// `Validation` before any provider call, `DuplicateAccount` for an existing
    /// email, otherwise the classified provider failure.
    #[instrument(skip_all, fields(operation = Operation::Signup.as_str()))]
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResult, ClassifiedError> {
        let request = validate::signup(request)?;

        let response = match self
            .provider(Operation::Signup)
            .admin_create_user(&request.email, &request.password)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let classified = classify(&err);
                if classified.category() != ErrorCategory::PrivilegeDenied {
                    return Err(classified);
                }
                warn!(
                    "Elevated signup refused, falling back to {}",
                    Operation::SignupSelfService.as_str()
                );
                self.provider(Operation::SignupSelfService)
                    .sign_up(
                        &request.email,
                        &request.password,
                        self.redirect_url.as_deref(),
                    )
                    .await
                    .map_err(|err| classify(&err))?
            }
        };

        normalize(response, SIGNUP_MESSAGE)
    }

    /// Revoke the session behind `access_token`.
    ///
    /// # Errors
    /// `AuthFailed` if the provider rejects the token or returns no user,
    /// otherwise the classified provider failure.
    #[instrument(skip_all, fields(operation = Operation::Signout.as_str()))]
    pub async fn signout(&self, access_token: &str) -> Result<String, ClassifiedError> {
        let response = self
            .provider(Operation::SessionLookup)
            .get_user(access_token)
            .await
            .map_err(|err| match err.status() {
                Some(401 | 403) => {
                    debug!("Signout with a rejected token: {err}");
                    ClassifiedError::new(ErrorCategory::AuthFailed, err.to_string())
                }
                _ => classify(&err),
            })?;
        normalize(response, "")?;

        self.provider(Operation::Signout)
            .sign_out(access_token)
            .await
            .map_err(|err| classify(&err))?;

        Ok(SIGNOUT_MESSAGE.to_string())
    }

    /// User behind an access token.
    ///
    /// # Errors
    /// `AuthFailed` when the provider returns no user.
    #[instrument(skip_all, fields(operation = Operation::SessionLookup.as_str()))]
    pub async fn current_user(&self, access_token: &str) -> Result<UserMap, ClassifiedError> {
        let response = self
            .provider(Operation::SessionLookup)
            .get_user(access_token)
            .await
            .map_err(|err| classify(&err))?;
        normalize(response, "").map(|result| result.user)
    }

    /// Ask the provider to email a reset link.
    ///
    /// The answer is the same whether or not the account exists; provider
    /// failures are logged and never returned.
    ///
    /// # Errors
    /// `Validation` for a malformed email only.
    #[instrument(skip_all, fields(operation = Operation::PasswordResetEmail.as_str()))]
    pub async fn request_password_reset(
        &self,
        request: &PasswordResetRequest,
    ) -> Result<String, ClassifiedError> {
        let request = validate::password_reset(request)?;

        if let Err(err) = self
            .provider(Operation::PasswordResetEmail)
            .reset_password_for_email(&request.email, self.redirect_url.as_deref())
            .await
        {
            let classified = classify(&err);
            error!("Password reset email failed: {classified}");
        }

        Ok(PASSWORD_RESET_MESSAGE.to_string())
    }

    /// Set a new password for the account named by the reset token.
    ///
    /// A bearer token is first exchanged for its account id with the
    /// restricted credential; the update itself uses the elevated credential.
    ///
    /// # Errors
    /// `Validation` for a bad token or an exchange that yields no account id,
    /// otherwise the classified provider failure.
    #[instrument(skip_all, fields(operation = Operation::PasswordSet.as_str()))]
    pub async fn set_password(&self, request: PasswordSetRequest) -> Result<String, ClassifiedError> {
        let request = validate::password_set(request)?.into_inner();

        let user_id = match request.target {
            ResetTarget::UserId(user_id) => user_id,
            ResetTarget::BearerToken(token) => self.exchange_reset_token(&token).await?,
        };

        self.provider(Operation::PasswordSet)
            .admin_update_password(&user_id, &request.new_password)
            .await
            .map_err(|err| classify(&err))?;

        info!("Password updated");
        Ok(PASSWORD_SET_MESSAGE.to_string())
    }

    async fn exchange_reset_token(&self, token: &str) -> Result<Uuid, ClassifiedError> {
        let response = self
            .provider(Operation::SessionLookup)
            .get_user(token)
            .await
            .map_err(|err| {
                debug!("Reset token exchange failed: {err}");
                ClassifiedError::validation(INVALID_RESET_TOKEN)
            })?;

        response
            .user_id()
            .and_then(|id| Uuid::parse_str(id).ok())
            .ok_or_else(|| ClassifiedError::validation(INVALID_RESET_TOKEN))
    }

    /// Confirm an email link token hash.
    ///
    /// # Errors
    /// `Validation` for a missing token or unknown type, otherwise the
    /// classified provider failure.
    #[instrument(skip_all, fields(operation = Operation::VerifyEmail.as_str()))]
    pub async fn verify_email(&self, request: &VerifyRequest) -> Result<AuthResult, ClassifiedError> {
        let verification = validate::verification(request)?;
        let response = self
            .provider(Operation::VerifyEmail)
            .verify_otp(&verification.token_hash, &verification.kind)
            .await
            .map_err(|err| classify(&err))?;
        normalize(response, VERIFY_MESSAGE)
    }

    /// Complete a provider redirect.
    ///
    /// Tokens handed over in the redirect are checked against the provider
    /// before they are trusted; a token hash is verified like an email link.
    ///
    /// # Errors
    /// `Validation` when the redirect carries nothing usable, otherwise the
    /// classified provider failure.
    #[instrument(skip_all, fields(operation = Operation::Callback.as_str()))]
    pub async fn callback(&self, params: CallbackParams) -> Result<AuthResult, ClassifiedError> {
        let provider = self.provider(Operation::Callback);

        match validate::callback(params)?.into_inner() {
            CallbackFlow::Failed(description) => Err(classify(&ProviderError::Rejected {
                status: 400,
                message: description,
            })),
            CallbackFlow::Tokens {
                access_token,
                refresh_token,
                expires_at,
                expires_in,
            } => {
                let mut response = provider
                    .get_user(&access_token)
                    .await
                    .map_err(|err| classify(&err))?;
                response.session = Some(ProviderSession {
                    access_token: Some(access_token),
                    refresh_token: Some(refresh_token),
                    expires_at,
                    expires_in,
                });
                normalize(response, CALLBACK_MESSAGE)
            }
            CallbackFlow::TokenHash { token_hash, kind } => {
                let response = provider
                    .verify_otp(&token_hash, &kind)
                    .await
                    .map_err(|err| classify(&err))?;
                normalize(response, CALLBACK_MESSAGE)
            }
        }
    }

    /// # Errors
    /// The classified provider failure.
    #[instrument(skip_all, fields(operation = Operation::ListUsers.as_str()))]
    pub async fn list_users(&self) -> Result<Vec<UserMap>, ClassifiedError> {
        self.provider(Operation::ListUsers)
            .admin_list_users()
            .await
            .map_err(|err| classify(&err))
    }

    /// Whether the provider health endpoint answers.
    ///
    /// # Errors
    /// The raw provider failure.
    pub async fn provider_health(&self) -> Result<(), ProviderError> {
        self.restricted.health().await
    }
}
