// File: rusty-forms-validate/src/value.rs
// Purpose: Dynamic option values for directive expressions and message params

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::dom::{Control, Event, TargetRef};
use crate::error::Result;
use crate::functions::FieldValue;

/// Insertion-ordered object; rule order follows key order
pub type Map = IndexMap<String, Value>;

/// Rule validator: `(element, value) -> passed`
pub type ValidatorFn = Rc<dyn Fn(&dyn Control, &FieldValue) -> bool>;

/// Event hook used by `before`/`after` options
pub type HookFn = Rc<dyn Fn(Option<&Event>)>;

/// Named check used by custom field validators: `(value, args) -> result`.
/// Only `Value::Bool(true)` counts as a pass.
pub type CheckFn = Rc<dyn Fn(&FieldValue, &[Value]) -> Value>;

/// A host callable stored inside an option tree.
///
/// Functions are leaves: merging never descends into them and a later
/// layer replaces them wholesale.
#[derive(Clone)]
pub struct Function(Rc<dyn Any>);

impl Function {
    /// Wrap a rule validator
    pub fn validator<F>(f: F) -> Self
    where
        F: Fn(&dyn Control, &FieldValue) -> bool + 'static,
    {
        let f: ValidatorFn = Rc::new(f);
        Self(Rc::new(f))
    }

    /// Wrap a `before`/`after` event hook
    pub fn hook<F>(f: F) -> Self
    where
        F: Fn(Option<&Event>) + 'static,
    {
        let f: HookFn = Rc::new(f);
        Self(Rc::new(f))
    }

    /// Wrap a named check for a custom field validator table
    pub fn check<F>(f: F) -> Self
    where
        F: Fn(&FieldValue, &[Value]) -> Value + 'static,
    {
        let f: CheckFn = Rc::new(f);
        Self(Rc::new(f))
    }

    pub fn as_validator(&self) -> Option<ValidatorFn> {
        self.0.downcast_ref::<ValidatorFn>().cloned()
    }

    pub fn as_hook(&self) -> Option<HookFn> {
        self.0.downcast_ref::<HookFn>().cloned()
    }

    pub fn as_check(&self) -> Option<CheckFn> {
        self.0.downcast_ref::<CheckFn>().cloned()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn shape(&self) -> &'static str {
        if self.0.is::<ValidatorFn>() {
            "validator"
        } else if self.0.is::<HookFn>() {
            "hook"
        } else if self.0.is::<CheckFn>() {
            "check"
        } else {
            "unknown"
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.shape())
    }
}

/// Option and message-parameter value.
///
/// Mirrors the shape of a declarative expression: JSON data plus host
/// functions and event targets.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    Function(Function),
    Target(TargetRef),
}

impl Value {
    /// Build an object from key/value pairs
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array from values
    pub fn array<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Parse a declarative expression (JSON)
    pub fn parse(expression: &str) -> Result<Self> {
        if expression.trim().is_empty() {
            return Ok(Value::Null);
        }
        let json: serde_json::Value = serde_json::from_str(expression)?;
        Ok(json.into())
    }

    /// Look up a key on an object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Insert a key on an object value; a non-object becomes an empty object first
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        if !matches!(self, Value::Object(_)) {
            *self = Value::Object(Map::new());
        }
        if let Value::Object(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    /// Builder form of [`Value::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Expression truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy; containers and functions never are
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Target(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_target(&self) -> Option<&TargetRef> {
        match self {
            Value::Target(t) => Some(t),
            _ => None,
        }
    }

    /// Plain JSON view of the tree; `None` when it holds a function or target
    pub fn to_json(&self) -> Option<serde_json::Value> {
        Some(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serde_json::Value::from(*n as i64)
            }
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect::<Option<_>>()?)
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| v.to_json().map(|v| (k.clone(), v)))
                    .collect::<Option<_>>()?,
            ),
            Value::Function(_) | Value::Target(_) => return None,
        })
    }

    /// Wrap a non-array in a single-element list; arrays pass through
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Value::Array(items) => items,
            other => vec![other],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => {
                // Integers print without the trailing ".0"
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Function(_) => f.write_str("[function]"),
            Value::Target(_) => f.write_str("[object EventTarget]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({:?})", b),
            Value::Number(n) => write!(f, "Number({:?})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Function(func) => write!(f, "{:?}", func),
            Value::Target(t) => write!(f, "Target({:?})", t.node_id()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Target(a), Value::Target(b)) => a.node_id() == b.node_id(),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<TargetRef> for Value {
    fn from(target: TargetRef) -> Self {
        Value::Target(target)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
