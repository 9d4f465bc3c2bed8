// File: rusty-forms-validate/src/validators/mod.rs
// Purpose: Field and form validation passes

pub mod field;
pub mod form;

pub use field::FieldValidator;
pub use form::FormValidator;

/// Result of one validation pass. Failing is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Success,
    Failed,
}

impl FieldOutcome {
    pub fn is_success(self) -> bool {
        self == FieldOutcome::Success
    }
}

/// Names of the custom events dispatched after each pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationEvents {
    /// Attribute that marks a control with its own field directive, e.g. `x-validate`
    pub directive: String,
    pub success: String,
    pub failed: String,
}

impl ValidationEvents {
    /// `prefix` is the directive prefix, `"x-"` by default
    pub fn new(prefix: &str) -> Self {
        let directive = format!("{}validate", prefix);
        Self {
            success: format!("{}:success", directive),
            failed: format!("{}:failed", directive),
            directive,
        }
    }
}

impl Default for ValidationEvents {
    fn default() -> Self {
        Self::new("x-")
    }
}
