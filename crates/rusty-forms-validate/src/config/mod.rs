// File: rusty-forms-validate/src/config/mod.rs
// Purpose: Typed form and field configuration built from merged option trees

pub mod defaults;
pub mod message;
pub mod validation;

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::dom::TargetRef;
use crate::error::{Result, ValidateError};
use crate::utils::ThrottleOptions;
use crate::value::{HookFn, Value};

pub use defaults::{field_default_config, form_default_config};
pub use message::{format_message_config, MessageConfig};
pub use validation::{format_validation_config, RuleCheck, ValidationConfig, ValidationRule};

/// How a field reacts to one DOM event
#[derive(Clone, Default)]
pub enum EventPolicy {
    #[default]
    Off,
    On,
    /// Enabled, with hooks around validation
    Hooks {
        before: Option<HookFn>,
        after: Option<HookFn>,
    },
}

impl EventPolicy {
    /// `false`/`null` disable, an object enables with hooks, anything else truthy enables
    pub fn from_value(key: &str, value: Option<&Value>) -> Result<Self> {
        match value {
            None => Ok(EventPolicy::Off),
            Some(Value::Object(map)) => Ok(EventPolicy::Hooks {
                before: hook(key, map.get("before"))?,
                after: hook(key, map.get("after"))?,
            }),
            Some(v) if v.is_truthy() => Ok(EventPolicy::On),
            Some(_) => Ok(EventPolicy::Off),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, EventPolicy::Off)
    }

    pub fn before(&self) -> Option<HookFn> {
        match self {
            EventPolicy::Hooks { before, .. } => before.clone(),
            _ => None,
        }
    }

    pub fn after(&self) -> Option<HookFn> {
        match self {
            EventPolicy::Hooks { after, .. } => after.clone(),
            _ => None,
        }
    }
}

impl fmt::Debug for EventPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventPolicy::Off => f.write_str("Off"),
            EventPolicy::On => f.write_str("On"),
            EventPolicy::Hooks { before, after } => f
                .debug_struct("Hooks")
                .field("before", &before.is_some())
                .field("after", &after.is_some())
                .finish(),
        }
    }
}

/// `inputLimitOpts`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputLimitOpts {
    pub debounce: DebounceOpts,
    pub throttle: ThrottleOpts,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DebounceOpts {
    /// Milliseconds
    pub wait: u64,
    #[serde(default)]
    pub immediate: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThrottleOpts {
    /// Milliseconds
    pub wait: u64,
    #[serde(default)]
    pub options: ThrottleOptions,
}

impl DebounceOpts {
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait)
    }
}

impl ThrottleOpts {
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait)
    }
}

/// Resolved options of a validated field
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub rules: ValidationConfig,
    pub messages: MessageConfig,
    pub report: bool,
    pub on_change: EventPolicy,
    pub on_blur: EventPolicy,
    pub on_input: EventPolicy,
    /// `"<method>[:<wait>]"`
    pub input_limit: String,
    pub input_limit_opts: InputLimitOpts,
}

impl FieldConfig {
    /// Build from a fully merged option tree (built-in defaults included)
    pub fn from_value(value: &Value) -> Result<Self> {
        let input_limit = match value.get("inputLimit") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(ValidateError::invalid_config("inputLimit", "expected a string"))
            }
        };

        Ok(Self {
            rules: format_validation_config(value.get("v").unwrap_or(&Value::Null))?,
            messages: format_message_config(value.get("m").unwrap_or(&Value::Null)),
            report: value.get("report").is_some_and(Value::is_truthy),
            on_change: EventPolicy::from_value("onChange", value.get("onChange"))?,
            on_blur: EventPolicy::from_value("onBlur", value.get("onBlur"))?,
            on_input: EventPolicy::from_value("onInput", value.get("onInput"))?,
            input_limit,
            input_limit_opts: deserialize("inputLimitOpts", value.get("inputLimitOpts"))?,
        })
    }
}

/// Event that runs form validation
#[derive(Clone)]
pub struct Trigger {
    pub target: TargetRef,
    pub event: String,
    pub prevent_default: bool,
    pub before: Option<HookFn>,
    pub after: Option<HookFn>,
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("target", &self.target.node_id())
            .field("event", &self.event)
            .field("prevent_default", &self.prevent_default)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Resolved options of a validated form
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub report: bool,
    pub trigger: Trigger,
}

impl FormConfig {
    /// Build from a fully merged option tree (built-in defaults included)
    pub fn from_value(value: &Value) -> Result<Self> {
        let trigger = value
            .get("trigger")
            .ok_or_else(|| ValidateError::invalid_config("trigger", "missing"))?;
        let target = trigger
            .get("target")
            .and_then(Value::as_target)
            .cloned()
            .ok_or_else(|| ValidateError::invalid_config("trigger.target", "expected an event target"))?;
        let event = trigger
            .get("event")
            .and_then(Value::as_str)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ValidateError::invalid_config("trigger.event", "expected an event name"))?
            .to_string();

        Ok(Self {
            report: value.get("report").is_some_and(Value::is_truthy),
            trigger: Trigger {
                target,
                event,
                prevent_default: trigger.get("preventDefault").is_some_and(Value::is_truthy),
                before: hook("trigger.before", trigger.get("before"))?,
                after: hook("trigger.after", trigger.get("after"))?,
            },
        })
    }
}

fn hook(key: &str, value: Option<&Value>) -> Result<Option<HookFn>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Function(func)) => func
            .as_hook()
            .map(Some)
            .ok_or_else(|| ValidateError::invalid_config(key, "expected an event hook")),
        Some(_) => Err(ValidateError::invalid_config(key, "expected an event hook")),
    }
}

fn deserialize<T: serde::de::DeserializeOwned>(key: &str, value: Option<&Value>) -> Result<T> {
    let json = value
        .and_then(Value::to_json)
        .ok_or_else(|| ValidateError::invalid_config(key, "expected plain data"))?;
    serde_json::from_value(json).map_err(|e| ValidateError::invalid_config(key, e.to_string()))
}
