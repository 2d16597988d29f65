//! Provider failure classification.
//!
//! Rules are matched in order against the lowercased provider message and the
//! first hit wins. The duplicate-account rules sit ahead of the privilege rule.

use super::error::{ClassifiedError, ErrorCategory};
use crate::provider::ProviderError;

const RULES: [(&str, ErrorCategory); 3] = [
    ("user already registered", ErrorCategory::DuplicateAccount),
    ("duplicate key value", ErrorCategory::DuplicateAccount),
    ("user not allowed", ErrorCategory::PrivilegeDenied),
];

/// Category named by the message rule table, if any rule matches.
#[must_use]
pub fn category_for_message(message: &str) -> Option<ErrorCategory> {
    let message = message.to_lowercase();
    RULES
        .iter()
        .find(|(needle, _)| message.contains(*needle))
        .map(|(_, category)| *category)
}

/// Map a raw provider failure to its stable category.
#[must_use]
pub fn classify(err: &ProviderError) -> ClassifiedError {
    let detail = err.to_string();
    let category = category_for_message(&detail).unwrap_or(if err.is_no_user() {
        ErrorCategory::AuthFailed
    } else {
        ErrorCategory::Provider
    });
    ClassifiedError::new(category, detail)
}
