//! # Authgate (Credential Gateway)
//!
//! `authgate` exposes login, signup, signout, password reset/set, email
//! verification and callback endpoints on top of a hosted identity provider
//! speaking the GoTrue `/auth/v1` REST API.
//!
//! ## Credential Gateway
//!
//! Every request goes through the same pipeline:
//!
//! - **Validate:** structural checks (email shape, password length, password
//!   confirmation, set-password token shape) run locally. A request failing them
//!   never reaches the provider.
//! - **Invoke:** one provider call with the credential fixed by the operation.
//!   End-user operations use the restricted (anon) key, administrative operations
//!   use the elevated (service) key.
//! - **Normalize:** the provider JSON is parsed into a user map plus an optional
//!   `{access_token, refresh_token, expires_at}` session. A response without a
//!   user is a failed authentication even if the HTTP call succeeded.
//! - **Classify:** provider failures are mapped to a fixed set of categories by an
//!   ordered, case-insensitive rule table.
//!
//! ## Enumeration Resistance
//!
//! Password reset always answers with the same message, whether or not the email
//! belongs to an account. Provider error details are logged, never returned.

pub mod api;
pub mod cli;
pub mod gateway;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
