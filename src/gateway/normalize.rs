use std::time::{SystemTime, UNIX_EPOCH};

use super::classify::classify;
use super::error::ClassifiedError;
use super::types::{AuthResult, Session};
use crate::provider::{ProviderError, ProviderResponse, ProviderSession};

pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}

/// Fixed-shape session, or `None` when a token or every expiry is missing.
pub(crate) fn session(raw: ProviderSession) -> Option<Session> {
    let expires_at = raw.expires_at.or_else(|| {
        raw.expires_in
            .map(|expires_in| now_unix_seconds().saturating_add(expires_in))
    })?;
    Some(Session {
        access_token: raw.access_token?,
        refresh_token: raw.refresh_token?,
        expires_at,
    })
}

/// Turn a provider response into an [`AuthResult`].
///
/// A response without a user, or with an empty user object, is an
/// authentication failure even if the transport call succeeded.
pub fn normalize(
    response: ProviderResponse,
    message: &str,
) -> Result<AuthResult, ClassifiedError> {
    let user = response
        .user
        .filter(|user| !user.is_empty())
        .ok_or_else(|| classify(&ProviderError::NoUser))?;

    Ok(AuthResult {
        user,
        session: response.session.and_then(session),
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ErrorCategory;
    use crate::provider::UserMap;
    use serde_json::json;

    fn user(id: &str) -> Option<UserMap> {
        json!({"id": id}).as_object().cloned()
    }

    fn raw_session(expires_at: Option<i64>, expires_in: Option<i64>) -> ProviderSession {
        ProviderSession {
            access_token: Some("tok".to_string()),
            refresh_token: Some("r1".to_string()),
            expires_at,
            expires_in,
        }
    }

    #[test]
    fn missing_user_is_auth_failed() {
        let err = normalize(ProviderResponse::default(), "Login successful").err();
        assert_eq!(err.map(|err| err.category()), Some(ErrorCategory::AuthFailed));
    }

    #[test]
    fn empty_user_is_auth_failed() {
        let response = ProviderResponse {
            user: Some(UserMap::new()),
            session: Some(raw_session(Some(1), None)),
        };
        let err = normalize(response, "Login successful").err();
        assert_eq!(err.map(|err| err.category()), Some(ErrorCategory::AuthFailed));
    }

    #[test]
    fn session_keeps_only_fixed_fields() -> anyhow::Result<()> {
        let response = ProviderResponse::from_value(json!({
            "access_token": "tok",
            "refresh_token": "r1",
            "expires_at": 1_234_567_890,
            "token_type": "bearer",
            "provider_token": "ignored",
            "user": {"id": "u1"}
        }));
        let result = normalize(response, "Login successful")?;

        assert_eq!(result.user, user("u1").unwrap_or_default());
        assert_eq!(
            result.session,
            Some(Session {
                access_token: "tok".to_string(),
                refresh_token: "r1".to_string(),
                expires_at: 1_234_567_890,
            })
        );
        assert_eq!(result.message, "Login successful");
        Ok(())
    }

    #[test]
    fn expires_in_is_converted_to_absolute_time() {
        let before = now_unix_seconds();
        let session = session(raw_session(None, Some(3600)));
        let expires_at = session.map(|session| session.expires_at).unwrap_or_default();
        assert!(expires_at >= before + 3600);
        assert!(expires_at <= now_unix_seconds() + 3600);
    }

    #[test]
    fn incomplete_session_is_dropped() {
        assert_eq!(session(raw_session(None, None)), None);

        let mut missing_refresh = raw_session(Some(10), None);
        missing_refresh.refresh_token = None;
        assert_eq!(session(missing_refresh), None);
    }

    #[test]
    fn user_without_session_is_success() -> anyhow::Result<()> {
        let response = ProviderResponse {
            user: user("u2"),
            session: None,
        };
        let result = normalize(response, "Signup successful")?;
        assert!(result.session.is_none());
        Ok(())
    }
}
