//! `reqwest` client for the GoTrue `/auth/v1` REST API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use super::{CredentialMode, IdentityProvider, ProviderError, ProviderResponse, UserMap};

// Keys tried, in order, to find a human-readable message in an error body.
const ERROR_MESSAGE_KEYS: [&str; 4] = ["msg", "message", "error_description", "error"];

/// Provider handle bound to one API key.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    auth_url: String,
    api_key: SecretString,
    mode: CredentialMode,
}

impl HttpProvider {
    /// Build a provider handle for `base_url` (the project URL, without `/auth/v1`).
    ///
    /// # Errors
    /// Returns an error if the URL is not an absolute http(s) URL or the HTTP
    /// client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        mode: CredentialMode,
        timeout: Duration,
    ) -> Result<Self> {
        let parsed =
            Url::parse(base_url).with_context(|| format!("Invalid provider URL: {base_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("Provider URL must use http or https: {base_url}");
        }

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build identity provider HTTP client")?;

        Ok(Self {
            client,
            auth_url: format!("{}/auth/v1", parsed.as_str().trim_end_matches('/')),
            api_key,
            mode,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.auth_url)
    }

    /// Every call carries the bound key as `apikey`; `Authorization` carries the
    /// end-user token when acting on behalf of a session, otherwise the key.
    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        self.client
            .request(method, self.endpoint(path))
            .header("apikey", key)
            .bearer_auth(bearer.unwrap_or(key))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ProviderError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "identity provider rejected request");
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|err| ProviderError::Malformed(err.to_string()))
    }
}

fn error_message(body: &str, status: StatusCode) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    parsed
        .as_ref()
        .and_then(|value| {
            ERROR_MESSAGE_KEYS
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str))
        })
        .map(str::to_string)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && parsed.is_none()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("identity provider request failed")
                .to_string()
        })
}

fn with_redirect(builder: RequestBuilder, redirect_to: Option<&str>) -> RequestBuilder {
    match redirect_to {
        Some(url) => builder.query(&[("redirect_to", url)]),
        None => builder,
    }
}

#[async_trait]
impl IdentityProvider for HttpProvider {
    fn mode(&self) -> CredentialMode {
        self.mode
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str()))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let builder = self
            .request(Method::POST, "token", None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        self.send(builder).await.map(ProviderResponse::from_value)
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str()))]
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<ProviderResponse, ProviderError> {
        let builder = self
            .request(Method::POST, "signup", None)
            .json(&json!({ "email": email, "password": password }));
        self.send(with_redirect(builder, redirect_to))
            .await
            .map(ProviderResponse::from_value)
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str()))]
    async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let builder = self
            .request(Method::POST, "admin/users", None)
            .json(&json!({ "email": email, "password": password }));
        self.send(builder).await.map(ProviderResponse::from_value)
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str()))]
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let builder = self.request(Method::POST, "logout", Some(access_token));
        self.send(builder).await.map(|_| ())
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str()))]
    async fn get_user(&self, access_token: &str) -> Result<ProviderResponse, ProviderError> {
        let builder = self.request(Method::GET, "user", Some(access_token));
        self.send(builder).await.map(ProviderResponse::from_value)
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str()))]
    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), ProviderError> {
        let builder = self
            .request(Method::POST, "recover", None)
            .json(&json!({ "email": email }));
        self.send(with_redirect(builder, redirect_to))
            .await
            .map(|_| ())
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str(), user_id = %user_id))]
    async fn admin_update_password(
        &self,
        user_id: &Uuid,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let builder = self
            .request(Method::PUT, &format!("admin/users/{user_id}"), None)
            .json(&json!({ "password": password }));
        self.send(builder).await.map(ProviderResponse::from_value)
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str()))]
    async fn admin_list_users(&self) -> Result<Vec<UserMap>, ProviderError> {
        let body = self
            .send(self.request(Method::GET, "admin/users", None))
            .await?;
        let users = body
            .get("users")
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::Malformed("missing users array".to_string()))?;

        Ok(users
            .iter()
            .filter_map(|user| user.as_object().cloned())
            .collect())
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str(), kind = kind))]
    async fn verify_otp(
        &self,
        token_hash: &str,
        kind: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let builder = self
            .request(Method::POST, "verify", None)
            .json(&json!({ "type": kind, "token_hash": token_hash }));
        self.send(builder).await.map(ProviderResponse::from_value)
    }

    #[instrument(skip_all, fields(mode = self.mode.as_str()))]
    async fn health(&self) -> Result<(), ProviderError> {
        self.send(self.request(Method::GET, "health", None))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_msg_field() {
        let body = r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#;
        assert_eq!(
            error_message(body, StatusCode::UNPROCESSABLE_ENTITY),
            "User already registered"
        );
    }

    #[test]
    fn error_message_falls_back_to_error_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            error_message(body, StatusCode::BAD_REQUEST),
            "Invalid login credentials"
        );
    }

    #[test]
    fn error_message_uses_plain_text_body() {
        assert_eq!(
            error_message("upstream timeout", StatusCode::BAD_GATEWAY),
            "upstream timeout"
        );
    }

    #[test]
    fn error_message_uses_status_reason_for_empty_body() {
        assert_eq!(error_message("", StatusCode::FORBIDDEN), "Forbidden");
        assert_eq!(error_message("{}", StatusCode::FORBIDDEN), "Forbidden");
    }

    #[test]
    fn new_rejects_non_http_urls() {
        let result = HttpProvider::new(
            "ftp://provider.test",
            SecretString::from("key".to_string()),
            CredentialMode::Restricted,
            Duration::from_secs(1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn endpoint_appends_auth_prefix_once() -> Result<()> {
        let provider = HttpProvider::new(
            "https://project.provider.test/",
            SecretString::from("key".to_string()),
            CredentialMode::Elevated,
            Duration::from_secs(1),
        )?;
        assert_eq!(
            provider.endpoint("admin/users"),
            "https://project.provider.test/auth/v1/admin/users"
        );
        assert_eq!(provider.mode(), CredentialMode::Elevated);
        Ok(())
    }
}
