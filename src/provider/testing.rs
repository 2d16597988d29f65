//! Scripted in-memory provider for gateway and handler tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use super::{CredentialMode, IdentityProvider, ProviderError, ProviderResponse, UserMap};

pub(crate) const SIGN_IN: &str = "sign_in_with_password";
pub(crate) const SIGN_UP: &str = "sign_up";
pub(crate) const ADMIN_CREATE_USER: &str = "admin_create_user";
pub(crate) const SIGN_OUT: &str = "sign_out";
pub(crate) const GET_USER: &str = "get_user";
pub(crate) const RESET_PASSWORD: &str = "reset_password_for_email";
pub(crate) const ADMIN_UPDATE_PASSWORD: &str = "admin_update_password";
pub(crate) const ADMIN_LIST_USERS: &str = "admin_list_users";
pub(crate) const VERIFY_OTP: &str = "verify_otp";
pub(crate) const HEALTH: &str = "health";

/// Canned answer: a JSON body, or a rejection `(status, message)`.
pub(crate) type Outcome = Result<Value, (u16, String)>;

/// Provider double that answers from a script and records every call.
///
/// Operations without a scripted outcome answer with an empty (`null`) body.
#[derive(Debug)]
pub(crate) struct MockProvider {
    mode: CredentialMode,
    outcomes: Mutex<HashMap<&'static str, Outcome>>,
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl MockProvider {
    pub(crate) fn new(mode: CredentialMode) -> Self {
        Self {
            mode,
            outcomes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with(self, operation: &'static str, outcome: Outcome) -> Self {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation, outcome);
        self
    }

    pub(crate) fn rejecting(self, operation: &'static str, status: u16, message: &str) -> Self {
        self.with(operation, Err((status, message.to_string())))
    }

    /// Recorded `(operation, key argument)` pairs in call order.
    pub(crate) fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls().len()
    }

    fn answer(&self, operation: &'static str, argument: &str) -> Result<Value, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((operation, argument.to_string()));

        let outcome = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(operation)
            .cloned()
            .unwrap_or(Ok(Value::Null));

        outcome.map_err(|(status, message)| ProviderError::Rejected { status, message })
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn mode(&self) -> CredentialMode {
        self.mode
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.answer(SIGN_IN, email).map(ProviderResponse::from_value)
    }

    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        _redirect_to: Option<&str>,
    ) -> Result<ProviderResponse, ProviderError> {
        self.answer(SIGN_UP, email).map(ProviderResponse::from_value)
    }

    async fn admin_create_user(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.answer(ADMIN_CREATE_USER, email)
            .map(ProviderResponse::from_value)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.answer(SIGN_OUT, access_token).map(|_| ())
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderResponse, ProviderError> {
        self.answer(GET_USER, access_token)
            .map(ProviderResponse::from_value)
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        _redirect_to: Option<&str>,
    ) -> Result<(), ProviderError> {
        self.answer(RESET_PASSWORD, email).map(|_| ())
    }

    async fn admin_update_password(
        &self,
        user_id: &Uuid,
        _password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.answer(ADMIN_UPDATE_PASSWORD, &user_id.to_string())
            .map(ProviderResponse::from_value)
    }

    async fn admin_list_users(&self) -> Result<Vec<UserMap>, ProviderError> {
        let body = self.answer(ADMIN_LIST_USERS, "")?;
        Ok(body
            .get("users")
            .and_then(Value::as_array)
            .map(|users| {
                users
                    .iter()
                    .filter_map(|user| user.as_object().cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn verify_otp(
        &self,
        token_hash: &str,
        _kind: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        self.answer(VERIFY_OTP, token_hash)
            .map(ProviderResponse::from_value)
    }

    async fn health(&self) -> Result<(), ProviderError> {
        self.answer(HEALTH, "").map(|_| ())
    }
}
