use thiserror::Error;

/// Raw failure from the identity provider, before classification.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx answer; `message` is the provider's own error text.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("invalid identity provider response: {0}")]
    Malformed(String),
    #[error("no user returned by identity provider")]
    NoUser,
}

impl ProviderError {
    #[must_use]
    pub const fn is_no_user(&self) -> bool {
        matches!(self, Self::NoUser)
    }

    /// HTTP status of a rejected call, if the provider answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
