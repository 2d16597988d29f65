//! Explicit parsing of provider JSON into optional user/session fields.
//!
//! GoTrue answers in three shapes depending on the endpoint and project settings:
//! a token response (`access_token`, `refresh_token`, ..., `user`), a bare user
//! object (`id`, `email`, ...), or a client-library style `{user, session}` pair.

use serde_json::{Map, Value};

pub type UserMap = Map<String, Value>;

/// Session fields as the provider sent them; all optional until normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
    pub expires_in: Option<i64>,
}

impl ProviderSession {
    fn from_map(map: &UserMap) -> Self {
        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        Self {
            access_token: text("access_token"),
            refresh_token: text("refresh_token"),
            expires_at: map.get("expires_at").and_then(Value::as_i64),
            expires_in: map.get("expires_in").and_then(Value::as_i64),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    pub user: Option<UserMap>,
    pub session: Option<ProviderSession>,
}

impl ProviderResponse {
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut body) = value else {
            return Self::default();
        };

        let nested_session = match body.remove("session") {
            Some(Value::Object(session)) => Some(ProviderSession::from_map(&session)),
            _ => None,
        };
        let top_level_session = body
            .contains_key("access_token")
            .then(|| ProviderSession::from_map(&body));

        let user = match body.remove("user") {
            Some(Value::Object(user)) => Some(user),
            // `"user": null` is an explicit "no identity".
            Some(_) => None,
            None => body.contains_key("id").then_some(body),
        };

        Self {
            user,
            session: nested_session.or(top_level_session),
        }
    }

    /// Account id (`user.id`) if the provider returned one.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| user.get("id"))
            .and_then(Value::as_str)
    }
}
