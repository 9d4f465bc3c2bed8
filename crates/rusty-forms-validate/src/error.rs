// File: rusty-forms-validate/src/error.rs
// Purpose: Configuration and usage errors raised while wiring validation

use thiserror::Error;

/// Errors raised while attaching or resolving validation.
///
/// Failed validation is never an error: a failing rule is reported through
/// the message store and the `:failed` event instead.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A validated field has no `id` or no `name` attribute
    #[error("Validation error: Form elements with validation rules must have an id and name attribute.")]
    MissingIdentity,

    /// A rule was declared without a message
    #[error("Message undefined. validation key: {key}")]
    MessageUndefined { key: String },

    /// A rule's validator slot holds a function that is not a rule validator
    #[error("Validator for `{key}` is not a rule validator function")]
    InvalidValidator { key: String },

    /// `inputLimit` names a method that does not exist
    #[error("Input rate limiter not found: {method}.")]
    UnknownRateLimiter { method: String },

    /// `inputLimit` carries a wait that is not a number of milliseconds
    #[error("Invalid wait `{wait}` for input rate limiter `{method}`")]
    InvalidRateLimitWait { method: String, wait: String },

    /// An option has the wrong shape
    #[error("Invalid configuration for `{key}`: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Radio and checkbox values are resolved through their owning form
    #[error("A form element is required.")]
    FormRequired,

    /// A declarative expression is not valid JSON
    #[error("Failed to parse expression: {0}")]
    Expression(#[from] serde_json::Error),
}

impl ValidateError {
    pub(crate) fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ValidateError>;
