// File: rusty-forms-validate/src/functions/html5_message.rs
// Purpose: Map native constraint failures to configured messages

use crate::config::MessageConfig;
use crate::dom::{Control, ValidityKey};
use crate::value::Value;

/// Picks message parameters for a control that fails constraint validation
pub trait Html5MessageResolver {
    /// `None` when the control is valid
    fn resolve(&self, control: &dyn Control, messages: &MessageConfig) -> Option<Vec<Value>>;
}

/// First failing reason (in [`ValidityKey::ORDER`]) that has a configured
/// message, else the platform's own validation message
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHtml5MessageResolver;

impl Html5MessageResolver for DefaultHtml5MessageResolver {
    fn resolve(&self, control: &dyn Control, messages: &MessageConfig) -> Option<Vec<Value>> {
        if control.check_validity() {
            return None;
        }
        let validity = control.validity();
        let configured = ValidityKey::ORDER
            .iter()
            .filter(|key| validity.get(**key))
            .find_map(|key| messages.get(*key));

        Some(match configured {
            Some(params) => params.to_vec(),
            None => vec![Value::String(control.validation_message())],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::format_message_config;
    use crate::dom::headless::HeadlessDocument;
    use crate::dom::{ControlKind, InputType};
    use serde_json::json;

    fn messages(json: serde_json::Value) -> MessageConfig {
        format_message_config(&Value::from(json))
    }

    #[test]
    fn test_valid_control_has_no_override() {
        let doc = HeadlessDocument::new();
        let input = doc.create_control(ControlKind::Text(InputType::Text), "t", "t");
        let config = messages(json!({"valueMissing": "Required"}));
        assert_eq!(DefaultHtml5MessageResolver.resolve(&*input, &config), None);
    }

    #[test]
    fn test_first_configured_reason_wins() {
        let doc = HeadlessDocument::new();
        let input = doc.create_control(ControlKind::Text(InputType::Email), "e", "e");
        input.set_attribute("minlength", "20");
        input.set_value("nope");

        // typeMismatch precedes tooShort, but only tooShort is configured
        let config = messages(json!({"tooShort": ["too.short", {"n": 20}]}));
        assert_eq!(
            DefaultHtml5MessageResolver.resolve(&*input, &config),
            Some(vec![Value::from("too.short"), Value::object([("n", 20)])])
        );

        let config = messages(json!({"tooShort": "short", "typeMismatch": "not an email"}));
        assert_eq!(
            DefaultHtml5MessageResolver.resolve(&*input, &config),
            Some(vec![Value::from("not an email")])
        );
    }

    #[test]
    fn test_falls_back_to_platform_message() {
        let doc = HeadlessDocument::new();
        let input = doc.create_control(ControlKind::Text(InputType::Text), "t", "t");
        input.set_required(true);
        assert_eq!(
            DefaultHtml5MessageResolver.resolve(&*input, &MessageConfig::default()),
            Some(vec![Value::from("Please fill out this field.")])
        );
    }
}
