use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Stable failure categories surfaced to callers, whatever the provider raised.
#[derive(ToSchema, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Caller input failed a local check; the provider was never called.
    Validation,
    /// The provider answered but produced no authenticated identity.
    AuthFailed,
    /// Signup collided with an existing account.
    DuplicateAccount,
    /// The credential lacked the privilege for an elevated operation.
    PrivilegeDenied,
    /// Any other remote failure.
    Provider,
}

impl ErrorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::AuthFailed => "AUTH_FAILED",
            Self::DuplicateAccount => "DUPLICATE_ACCOUNT",
            Self::PrivilegeDenied => "PRIVILEGE_DENIED",
            Self::Provider => "PROVIDER_ERROR",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized failure: a category plus a diagnostic detail.
///
/// For `Validation` the detail is safe to show to users. For every other
/// category it is provider text and only meant for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category}: {detail}")]
pub struct ClassifiedError {
    category: ErrorCategory,
    detail: String,
}

impl ClassifiedError {
    #[must_use]
    pub fn new(category: ErrorCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, detail)
    }

    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.category
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}
