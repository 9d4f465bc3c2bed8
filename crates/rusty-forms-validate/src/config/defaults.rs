// File: rusty-forms-validate/src/config/defaults.rs
// Purpose: Built-in option layers for forms and fields

use serde_json::json;

use crate::dom::TargetRef;
use crate::value::Value;

/// Built-in form options. The trigger listens on `target`, normally the form itself.
pub fn form_default_config(target: TargetRef) -> Value {
    let mut config = Value::from(json!({
        "report": true,
        "trigger": {
            "event": "submit",
            "preventDefault": true,
            "before": null,
            "after": null,
        },
    }));
    if let Value::Object(map) = &mut config {
        if let Some(trigger) = map.get_mut("trigger") {
            trigger.insert("target", target);
        }
    }
    config
}

/// Built-in field options
pub fn field_default_config() -> Value {
    Value::from(json!({
        "v": {},
        "m": {},
        "report": false,
        "onChange": true,
        "onBlur": false,
        "onInput": false,
        "inputLimit": "none",
        "inputLimitOpts": {
            "debounce": { "wait": 250, "immediate": false },
            "throttle": {
                "wait": 500,
                "options": { "leading": false, "trailing": true },
            },
        },
    }))
}
