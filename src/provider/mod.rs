//! Identity provider seam.
//!
//! The gateway never talks HTTP itself: it is handed two [`IdentityProvider`]
//! handles at construction, one bound to the restricted (anon) credential and one
//! bound to the elevated (service) credential. [`HttpProvider`] is the production
//! implementation for GoTrue-compatible `/auth/v1` endpoints.

mod client;
mod error;
mod response;
#[cfg(test)]
pub(crate) mod testing;

pub use client::HttpProvider;
pub use error::ProviderError;
pub use response::{ProviderResponse, ProviderSession, UserMap};

use async_trait::async_trait;
use uuid::Uuid;

/// Which provider key a request is signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// End-user self-service key (login, session lookup, reset emails).
    Restricted,
    /// Administrative key (provisioning accounts, forced password set, listing).
    Elevated,
}

impl CredentialMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restricted => "restricted",
            Self::Elevated => "elevated",
        }
    }
}

/// Remote identity provider operations, each bound to a single credential.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Credential this handle signs requests with.
    fn mode(&self) -> CredentialMode;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Self-service signup; the provider sends the confirmation email.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Provision an account through the admin API.
    async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Revoke the session behind an end-user access token.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;

    /// Resolve an end-user access token to its account.
    async fn get_user(&self, access_token: &str) -> Result<ProviderResponse, ProviderError>;

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), ProviderError>;

    async fn admin_update_password(
        &self,
        user_id: &Uuid,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError>;

    async fn admin_list_users(&self) -> Result<Vec<UserMap>, ProviderError>;

    /// Exchange an email link token hash for a verified session.
    async fn verify_otp(&self, token_hash: &str, kind: &str)
        -> Result<ProviderResponse, ProviderError>;

    async fn health(&self) -> Result<(), ProviderError>;
}
