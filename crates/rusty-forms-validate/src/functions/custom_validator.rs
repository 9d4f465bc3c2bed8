// File: rusty-forms-validate/src/functions/custom_validator.rs
// Purpose: Named validation functions looked up by rule key

use indexmap::IndexMap;

use super::FieldValue;
use crate::dom::Control;
use crate::value::{CheckFn, Function, Value};

/// Validates rules that carry arguments instead of a validator function
pub trait CustomFieldValidator {
    fn is_supported(&self, name: &str) -> bool;

    /// A missing function or a non-boolean result counts as a failure
    fn validate(&self, control: &dyn Control, value: &FieldValue, name: &str, args: &[Value]) -> bool;
}

/// A table of named checks
#[derive(Clone, Default)]
pub struct CustomValidatorTable {
    checks: IndexMap<String, CheckFn>,
}

impl CustomValidatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check under `name`, replacing any previous one
    pub fn with<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&FieldValue, &[Value]) -> Value + 'static,
    {
        self.insert(name, Function::check(check));
        self
    }

    /// Register a check function. Functions of another shape are ignored.
    pub fn insert(&mut self, name: impl Into<String>, function: Function) {
        if let Some(check) = function.as_check() {
            self.checks.insert(name.into(), check);
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }
}

/// Build a table from an object of check functions; other entries are skipped
pub fn create_custom_field_validator(functions: &Value) -> CustomValidatorTable {
    let mut table = CustomValidatorTable::new();
    if let Some(map) = functions.as_object() {
        for (name, value) in map {
            if let Some(function) = value.as_function() {
                table.insert(name.clone(), function.clone());
            }
        }
    }
    table
}

impl CustomFieldValidator for CustomValidatorTable {
    fn is_supported(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    fn validate(&self, _control: &dyn Control, value: &FieldValue, name: &str, args: &[Value]) -> bool {
        match self.checks.get(name) {
            Some(check) => matches!(check(value, args), Value::Bool(true)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::headless::HeadlessDocument;
    use crate::dom::{ControlKind, InputType};

    #[test]
    fn test_table_dispatch() {
        let doc = HeadlessDocument::new();
        let input = doc.create_control(ControlKind::Text(InputType::Text), "t", "t");
        let table = CustomValidatorTable::new()
            .with("equalsArg", |value, args| {
                Value::Bool(value.as_text() == args.first().and_then(Value::as_str))
            })
            .with("sloppy", |_, _| Value::from("yes"));

        assert!(table.is_supported("equalsArg"));
        assert!(!table.is_supported("missing"));

        let value = FieldValue::from("abc");
        assert!(table.validate(&*input, &value, "equalsArg", &[Value::from("abc")]));
        assert!(!table.validate(&*input, &value, "equalsArg", &[Value::from("xyz")]));
        // Non-boolean results fail instead of erroring
        assert!(!table.validate(&*input, &value, "sloppy", &[]));
        assert!(!table.validate(&*input, &value, "missing", &[]));
    }

    #[test]
    fn test_from_value_skips_non_checks() {
        let functions = Value::object([
            ("ok", Value::Function(Function::check(|_, _| Value::Bool(true)))),
            ("hook", Value::Function(Function::hook(|_| {}))),
            ("text", Value::from("not a function")),
        ]);
        let table = create_custom_field_validator(&functions);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["ok"]);
    }
}
