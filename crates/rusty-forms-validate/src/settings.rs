// File: rusty-forms-validate/src/settings.rs
// Purpose: Plugin defaults loaded from a TOML file

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map};
use std::fs;
use std::path::Path;

use crate::functions::FunctionsOptions;
use crate::plugin::PluginOptions;
use crate::value::Value;

/// Plugin settings.
///
/// Unset options leave the built-in defaults in place.
///
/// ```toml
/// prefix = "x-"
///
/// [form]
/// report = false
/// event = "submit"
///
/// [field]
/// on_input = true
/// input_limit = "debounce"
/// debounce_wait = 300
///
/// [field.messages]
/// valueMissing = "This field is required"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directive prefix (default: "x-")
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub form: FormSettings,

    #[serde(default)]
    pub field: FieldSettings,
}

/// Form directive defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(default)]
    pub report: Option<bool>,

    /// Trigger event name
    #[serde(default)]
    pub event: Option<String>,

    #[serde(default)]
    pub prevent_default: Option<bool>,
}

/// Field directive defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldSettings {
    #[serde(default)]
    pub report: Option<bool>,

    #[serde(default)]
    pub on_change: Option<bool>,

    #[serde(default)]
    pub on_blur: Option<bool>,

    #[serde(default)]
    pub on_input: Option<bool>,

    /// `none`, `debounce[:ms]` or `throttle[:ms]`
    #[serde(default)]
    pub input_limit: Option<String>,

    #[serde(default)]
    pub debounce_wait: Option<u64>,

    #[serde(default)]
    pub debounce_immediate: Option<bool>,

    #[serde(default)]
    pub throttle_wait: Option<u64>,

    #[serde(default)]
    pub throttle_leading: Option<bool>,

    #[serde(default)]
    pub throttle_trailing: Option<bool>,

    /// Default messages keyed by validity reason, e.g. `valueMissing`
    #[serde(default)]
    pub messages: IndexMap<String, serde_json::Value>,
}

fn default_prefix() -> String {
    "x-".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            form: FormSettings::default(),
            field: FieldSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))?;

        Ok(settings)
    }

    /// The form option layer: only the options that are set
    pub fn form_options(&self) -> Value {
        let mut options = Map::new();
        let mut trigger = Map::new();
        insert(&mut options, "report", self.form.report);
        insert(&mut trigger, "event", self.form.event.clone());
        insert(&mut trigger, "preventDefault", self.form.prevent_default);
        if !trigger.is_empty() {
            options.insert("trigger".into(), trigger.into());
        }
        Value::from(serde_json::Value::Object(options))
    }

    /// The field option layer: only the options that are set
    pub fn field_options(&self) -> Value {
        let field = &self.field;
        let mut options = Map::new();
        insert(&mut options, "report", field.report);
        insert(&mut options, "onChange", field.on_change);
        insert(&mut options, "onBlur", field.on_blur);
        insert(&mut options, "onInput", field.on_input);
        insert(&mut options, "inputLimit", field.input_limit.clone());

        let mut debounce = Map::new();
        insert(&mut debounce, "wait", field.debounce_wait);
        insert(&mut debounce, "immediate", field.debounce_immediate);

        let mut throttle_options = Map::new();
        insert(&mut throttle_options, "leading", field.throttle_leading);
        insert(&mut throttle_options, "trailing", field.throttle_trailing);
        let mut throttle = Map::new();
        insert(&mut throttle, "wait", field.throttle_wait);
        if !throttle_options.is_empty() {
            throttle.insert("options".into(), throttle_options.into());
        }

        let mut limit_opts = Map::new();
        if !debounce.is_empty() {
            limit_opts.insert("debounce".into(), debounce.into());
        }
        if !throttle.is_empty() {
            limit_opts.insert("throttle".into(), throttle.into());
        }
        if !limit_opts.is_empty() {
            options.insert("inputLimitOpts".into(), limit_opts.into());
        }

        if !field.messages.is_empty() {
            options.insert("m".into(), json!(field.messages));
        }
        Value::from(serde_json::Value::Object(options))
    }
}

fn insert<T: Into<serde_json::Value>>(map: &mut Map<String, serde_json::Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.into());
    }
}

impl PluginOptions {
    /// Plugin options whose default layers come from `settings`
    pub fn from_settings(settings: &Settings, functions: FunctionsOptions) -> Self {
        Self {
            functions,
            default_form_options: settings.form_options(),
            default_field_options: settings.field_options(),
            prefix: settings.prefix.clone(),
        }
    }
}
