// File: rusty-forms-validate/src/config/validation.rs
// Purpose: Expand the abbreviated `v` option into ordered validation rules

use indexmap::IndexMap;
use std::fmt;

use crate::error::{Result, ValidateError};
use crate::value::{Value, ValidatorFn};

/// What a rule runs
#[derive(Clone)]
pub enum RuleCheck {
    /// A direct validator function
    Validator(ValidatorFn),
    /// Arguments for the custom field validator registered under the rule key
    Args(Vec<Value>),
}

impl fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCheck::Validator(_) => f.write_str("Validator(..)"),
            RuleCheck::Args(args) => f.debug_tuple("Args").field(args).finish(),
        }
    }
}

/// A normalized rule. `message` is never empty.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub check: RuleCheck,
    pub message: Vec<Value>,
}

/// Rules keyed by name, in evaluation order
#[derive(Debug, Clone, Default)]
pub struct ValidationConfig(IndexMap<String, ValidationRule>);

impl ValidationConfig {
    pub fn get(&self, key: &str) -> Option<&ValidationRule> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationRule)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalize the abbreviated rule syntax.
///
/// | value                         | validator          | message          |
/// |-------------------------------|--------------------|------------------|
/// | `[fn, m]`                     | `fn`               | `m` as a list    |
/// | `[a, b, ..]` (no leading fn)  | none               | the whole array  |
/// | `{v, m}` (only these keys)    | `v` (fn or args)   | `m` as a list    |
/// | any other non-null value      | none               | `[value]`        |
///
/// A rule without a message fails with [`ValidateError::MessageUndefined`].
pub fn format_validation_config(input: &Value) -> Result<ValidationConfig> {
    let map = match input {
        Value::Null => return Ok(ValidationConfig::default()),
        Value::Object(map) => map,
        _ => return Err(ValidateError::invalid_config("v", "expected an object of rules")),
    };

    let mut rules = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        rules.insert(key.clone(), format_rule(key, value)?);
    }
    Ok(ValidationConfig(rules))
}

fn format_rule(key: &str, value: &Value) -> Result<ValidationRule> {
    let undefined = || ValidateError::MessageUndefined {
        key: key.to_string(),
    };

    match value {
        Value::Null => Err(undefined()),
        Value::Array(items) => match items.first() {
            Some(Value::Function(func)) => {
                let validator = func.as_validator().ok_or_else(|| ValidateError::InvalidValidator {
                    key: key.to_string(),
                })?;
                let message = match items.get(1) {
                    None | Some(Value::Null) => return Err(undefined()),
                    Some(m) => m.clone().into_list(),
                };
                Ok(ValidationRule {
                    check: RuleCheck::Validator(validator),
                    message,
                })
            }
            _ => Ok(ValidationRule {
                check: RuleCheck::Args(Vec::new()),
                message: non_empty(items.clone()).ok_or_else(undefined)?,
            }),
        },
        Value::Object(map) if is_rule_object(map) => {
            let check = match map.get("v") {
                None | Some(Value::Null) => RuleCheck::Args(Vec::new()),
                Some(Value::Function(func)) => {
                    RuleCheck::Validator(func.as_validator().ok_or_else(|| {
                        ValidateError::InvalidValidator {
                            key: key.to_string(),
                        }
                    })?)
                }
                Some(other) => RuleCheck::Args(other.clone().into_list()),
            };
            let message = match map.get("m") {
                None | Some(Value::Null) => return Err(undefined()),
                Some(m) => non_empty(m.clone().into_list()).ok_or_else(undefined)?,
            };
            Ok(ValidationRule { check, message })
        }
        other => Ok(ValidationRule {
            check: RuleCheck::Args(Vec::new()),
            message: vec![other.clone()],
        }),
    }
}

/// `{v, m}` objects: at least one of the two keys and nothing else
fn is_rule_object(map: &crate::value::Map) -> bool {
    !map.is_empty() && map.keys().all(|k| k == "v" || k == "m")
}

fn non_empty(items: Vec<Value>) -> Option<Vec<Value>> {
    (!items.is_empty()).then_some(items)
}
