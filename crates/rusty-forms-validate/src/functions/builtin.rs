// File: rusty-forms-validate/src/functions/builtin.rs
// Purpose: Ready-made named checks for custom field validation

//! Checks for rules written in the `{v: args, m: message}` form:
//!
//! ```text
//! {"v": {"minLength": {"v": 3, "m": "Too short"}, "startsWith": {"v": "user_", "m": "Bad prefix"}}}
//! ```
//!
//! Text checks apply to every entry of a list value. Length checks count
//! characters for text and entries for lists and files.

use regex::Regex;
use tracing::warn;

use super::{CustomValidatorTable, FieldValue};
use crate::value::Value;

/// Table with every built-in check registered
pub fn builtin_validators() -> CustomValidatorTable {
    CustomValidatorTable::new()
        .with("email", |value, _| each(value, is_valid_email))
        .with("url", |value, _| each(value, is_valid_url))
        .with("contains", |value, args| {
            with_text_arg(args, |needle| each(value, |s| s.contains(needle)))
        })
        .with("notContains", |value, args| {
            with_text_arg(args, |needle| each(value, |s| !s.contains(needle)))
        })
        .with("startsWith", |value, args| {
            with_text_arg(args, |prefix| each(value, |s| s.starts_with(prefix)))
        })
        .with("endsWith", |value, args| {
            with_text_arg(args, |suffix| each(value, |s| s.ends_with(suffix)))
        })
        .with("equals", |value, args| {
            with_text_arg(args, |expected| each(value, |s| s == expected))
        })
        .with("minLength", |value, args| {
            Value::Bool(number_arg(args, 0).is_some_and(|min| value.len() as f64 >= min))
        })
        .with("maxLength", |value, args| {
            Value::Bool(number_arg(args, 0).is_some_and(|max| value.len() as f64 <= max))
        })
        .with("length", |value, args| {
            let len = value.len() as f64;
            Value::Bool(match (number_arg(args, 0), number_arg(args, 1)) {
                (Some(min), Some(max)) => len >= min && len <= max,
                (Some(exact), None) => len == exact,
                _ => false,
            })
        })
        .with("matches", |value, args| {
            with_text_arg(args, |pattern| match Regex::new(pattern) {
                Ok(re) => each(value, |s| re.is_match(s)),
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "invalid pattern in `matches` rule");
                    Value::Bool(false)
                }
            })
        })
        .with("oneOf", |value, args| {
            let allowed: Vec<String> = args
                .iter()
                .flat_map(|arg| arg.clone().into_list())
                .map(|arg| arg.to_string())
                .collect();
            each(value, |s| allowed.iter().any(|a| a == s))
        })
        .with("min", |value, args| {
            number_arg(args, 0)
                .map(|min| each(value, |s| parse_number(s).is_some_and(|n| n >= min)))
                .unwrap_or(Value::Bool(false))
        })
        .with("max", |value, args| {
            number_arg(args, 0)
                .map(|max| each(value, |s| parse_number(s).is_some_and(|n| n <= max)))
                .unwrap_or(Value::Bool(false))
        })
}

/// Run a text predicate over every text in the value
fn each(value: &FieldValue, check: impl Fn(&str) -> bool) -> Value {
    let passed = match value {
        FieldValue::Text(s) => check(s),
        FieldValue::List(items) => items.iter().all(|s| check(s)),
        FieldValue::Files(files) => files.iter().all(|f| check(&f.name)),
    };
    Value::Bool(passed)
}

fn with_text_arg(args: &[Value], check: impl FnOnce(&str) -> Value) -> Value {
    match args.first() {
        Some(Value::Null) | None => Value::Bool(false),
        Some(arg) => check(&arg.to_string()),
    }
}

fn number_arg(args: &[Value], index: usize) -> Option<f64> {
    match args.get(index)? {
        Value::Number(n) => Some(*n),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Basic email shape: one `@`, a dotted domain, conservative characters
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    // Exactly one @
    if domain.contains('@') {
        return false;
    }

    if local.is_empty() || local.len() > 64 {
        return false;
    }

    if domain.is_empty() || domain.len() > 255 || !domain.contains('.') {
        return false;
    }

    // Domain can't start or end with dot or hyphen, or repeat dots
    if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) || domain.contains("..") {
        return false;
    }

    let valid_local = |c: char| c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | '+');
    let valid_domain = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');

    local.chars().all(valid_local) && domain.chars().all(valid_domain)
}

/// `http(s)://` followed by a dotted host
pub fn is_valid_url(url: &str) -> bool {
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !host.is_empty() && host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
}
