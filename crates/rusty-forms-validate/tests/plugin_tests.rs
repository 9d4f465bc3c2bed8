/// Integration tests for the validation directives against the headless DOM
///
/// Each test attaches form/field directives the way a host page would and
/// drives them with DOM events.

use pretty_assertions::assert_eq;
use rusty_forms_validate::dom::headless::{HeadlessControl, HeadlessDocument, HeadlessForm};
use rusty_forms_validate::dom::{Control, ControlKind, Document, Event, EventTarget, InputType, Listener};
use rusty_forms_validate::functions::FieldValue;
use rusty_forms_validate::{
    builtin_validators, Function, FunctionsOptions, PluginOptions, ValidateError, ValidatePlugin,
    Value,
};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn text_field(doc: &HeadlessDocument, form: &Rc<HeadlessForm>, id: &str) -> Rc<HeadlessControl> {
    let control = doc.create_control(ControlKind::Text(InputType::Text), id, id);
    form.append(&control);
    control
}

/// Records the custom events dispatched on a target
fn record_events(target: &dyn EventTarget, names: &[&str]) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let listener: Listener = Rc::new(move |e: &Event| sink.borrow_mut().push(e.kind().to_string()));
    for name in names {
        target.add_event_listener(name, listener.clone());
    }
    log
}

/// Route tracing output to the test harness
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn expression(value: serde_json::Value) -> Value {
    Value::from(value)
}

// ============================================================================
// Form submission
// ============================================================================

#[test]
fn test_required_field_reports_configured_message() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let form = doc.create_form("profile");
    let name = text_field(&doc, &form, "name");
    name.set_required(true);

    let _form = plugin.validate_form(form.clone(), &Value::Null).unwrap();
    let _field = plugin
        .validate(
            name.clone(),
            &expression(json!({ "m": { "valueMissing": "Please enter your name" } })),
        )
        .unwrap();

    let submitted = form.dispatch_event(&Event::new("submit"));
    assert!(!submitted);
    assert_eq!(plugin.message_store().get(&*name), "Please enter your name");
    assert_eq!(name.validation_message(), "Please enter your name");
    assert!(!name.validity().valid());
    assert_eq!(form.reports(), 1);

    name.set_value("Jane");
    let submitted = form.dispatch_event(&Event::new("submit"));
    assert!(submitted);
    assert_eq!(plugin.message_store().get(&*name), "");
    assert_eq!(name.validation_message(), "");
    assert!(name.validity().valid());
}

#[test]
fn test_field_reports_only_after_first_submission() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let form = doc.create_form("profile");
    let name = text_field(&doc, &form, "name");
    name.set_required(true);

    let _form = plugin.validate_form(form.clone(), &Value::Null).unwrap();
    let _field = plugin.validate(name.clone(), &Value::Null).unwrap();

    name.dispatch_event(&Event::new("change"));
    assert_eq!(name.reports(), 0);
    assert_eq!(plugin.message_store().get(&*name), "Please fill out this field.");

    form.dispatch_event(&Event::new("submit"));
    let after_submit = name.reports();

    // Now in submission mode: report, then re-report once the message is set
    name.dispatch_event(&Event::new("change"));
    assert!(name.reports() >= after_submit + 2);
}

#[test]
fn test_form_without_report_only_checks() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let form = doc.create_form("profile");
    let name = text_field(&doc, &form, "name");
    name.set_required(true);

    let _form = plugin
        .validate_form(form.clone(), &expression(json!({ "report": false })))
        .unwrap();
    let _field = plugin.validate(name.clone(), &Value::Null).unwrap();

    form.dispatch_event(&Event::new("submit"));
    form.dispatch_event(&Event::new("submit"));
    assert_eq!(form.reports(), 0);
    assert_eq!(name.reports(), 0);
}

#[test]
fn test_form_trigger_events_and_hooks() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let form = doc.create_form("profile");
    let name = text_field(&doc, &form, "name");
    name.set_required(true);

    let calls = Rc::new(RefCell::new(Vec::new()));
    let (before_log, after_log) = (calls.clone(), calls.clone());
    let trigger = Value::object([(
        "trigger",
        Value::object([
            ("event", Value::from("click")),
            ("preventDefault", Value::from(false)),
            (
                "before",
                Value::from(Function::hook(move |e| {
                    before_log.borrow_mut().push(format!("before:{}", e.map(|e| e.kind()).unwrap_or("")))
                })),
            ),
            (
                "after",
                Value::from(Function::hook(move |_| after_log.borrow_mut().push("after".to_string()))),
            ),
        ]),
    )]);

    let _form = plugin.validate_form(form.clone(), &trigger).unwrap();
    let _field = plugin.validate(name.clone(), &Value::Null).unwrap();
    let events = record_events(&*form, &["x-validate:success", "x-validate:failed"]);

    assert_eq!(form.listener_count("submit"), 0);
    let click = Event::new("click");
    assert!(form.dispatch_event(&click));
    assert!(!click.default_prevented());
    assert_eq!(*calls.borrow(), vec!["before:click".to_string(), "after".to_string()]);
    assert_eq!(*events.borrow(), vec!["x-validate:failed".to_string()]);

    name.set_value("Jane");
    form.dispatch_event(&Event::new("click"));
    assert_eq!(events.borrow().last().map(String::as_str), Some("x-validate:success"));
}

#[test]
fn test_custom_prefix_names_events() {
    let plugin = ValidatePlugin::new(PluginOptions {
        prefix: "data-".into(),
        ..Default::default()
    });
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Text), "code", "code");
    input.set_required(true);
    let events = record_events(&*input, &["data-validate:failed", "x-validate:failed"]);

    let _field = plugin.validate(input.clone(), &Value::Null).unwrap();
    input.dispatch_event(&Event::new("change"));
    assert_eq!(*events.borrow(), vec!["data-validate:failed".to_string()]);
}

// ============================================================================
// Field rules
// ============================================================================

#[test]
fn test_custom_rule_message() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Text), "nick", "nick");
    let events = record_events(&*input, &["x-validate:success", "x-validate:failed"]);

    let rule = Value::array([
        Value::from(Function::validator(|_, value: &FieldValue| value.len() > 1)),
        Value::from("too short"),
    ]);
    let config = Value::object([("v", Value::object([("minLen", rule)]))]);
    let _field = plugin.validate(input.clone(), &config).unwrap();

    input.set_value("a");
    input.dispatch_event(&Event::new("change"));
    assert_eq!(plugin.message_store().get(&*input), "too short");
    assert_eq!(input.validation_message(), "too short");

    input.set_value("ab");
    input.dispatch_event(&Event::new("change"));
    assert_eq!(plugin.message_store().get(&*input), "");
    assert_eq!(
        *events.borrow(),
        vec!["x-validate:failed".to_string(), "x-validate:success".to_string()]
    );
}

#[test]
fn test_empty_optional_field_skips_rules() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Text), "nick", "nick");

    let rule = Value::array([Value::from(Function::validator(|_, _| false)), Value::from("never")]);
    let config = Value::object([("v", Value::object([("fails", rule)]))]);
    let _field = plugin.validate(input.clone(), &config).unwrap();

    input.set_value("   ");
    input.dispatch_event(&Event::new("change"));
    assert_eq!(plugin.message_store().get(&*input), "");
}

#[test]
fn test_builtin_validators_by_name() {
    let plugin = ValidatePlugin::new(PluginOptions {
        functions: FunctionsOptions::default().with_custom_validator(Rc::new(builtin_validators())),
        ..Default::default()
    });
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Text), "user", "user");

    let config = expression(json!({
        "v": {
            "minLength": { "v": 3, "m": "At least 3 characters" },
            "startsWith": { "v": "user_", "m": "Must start with user_" },
        }
    }));
    let _field = plugin.validate(input.clone(), &config).unwrap();

    input.set_value("ab");
    input.dispatch_event(&Event::new("change"));
    assert_eq!(plugin.message_store().get(&*input), "At least 3 characters");

    input.set_value("admin");
    input.dispatch_event(&Event::new("change"));
    assert_eq!(plugin.message_store().get(&*input), "Must start with user_");

    input.set_value("user_jane");
    input.dispatch_event(&Event::new("change"));
    assert_eq!(plugin.message_store().get(&*input), "");
}

#[test]
fn test_unknown_rule_passes() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Text), "user", "user");
    let events = record_events(&*input, &["x-validate:success", "x-validate:failed"]);

    let config = expression(json!({ "v": { "noSuchRule": "Never shown" } }));
    let _field = plugin.validate(input.clone(), &config).unwrap();

    input.set_value("anything");
    input.dispatch_event(&Event::new("change"));
    assert_eq!(*events.borrow(), vec!["x-validate:success".to_string()]);
}

#[test]
fn test_checkbox_group_value() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let form = doc.create_form("prefs");
    let a = doc.create_control(ControlKind::Checkbox, "tag-a", "tags");
    let b = doc.create_control(ControlKind::Checkbox, "tag-b", "tags");
    a.set_value("news");
    b.set_value("offers");
    form.append(&a);
    form.append(&b);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let rule = Value::array([
        Value::from(Function::validator(move |_, value: &FieldValue| {
            let list = value.as_list().map(<[String]>::to_vec).unwrap_or_default();
            log.borrow_mut().push(list.clone());
            list.len() >= 2
        })),
        Value::from("Pick both"),
    ]);
    let config = Value::object([("v", Value::object([("both", rule)]))]);
    let _field = plugin.validate(a.clone(), &config).unwrap();

    a.set_checked(true);
    a.dispatch_event(&Event::new("change"));
    assert_eq!(plugin.message_store().get(&*a), "Pick both");

    b.set_checked(true);
    a.dispatch_event(&Event::new("change"));
    assert_eq!(plugin.message_store().get(&*a), "");
    assert_eq!(
        seen.borrow().last().cloned(),
        Some(vec!["news".to_string(), "offers".to_string()])
    );
}

// ============================================================================
// Grouped controls
// ============================================================================

#[test]
fn test_radio_group_shares_handlers_after_submit() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let form = doc.create_form("plan");
    let basic = doc.create_control(ControlKind::Radio, "basic", "plan");
    let pro = doc.create_control(ControlKind::Radio, "pro", "plan");
    let team = doc.create_control(ControlKind::Radio, "team", "plan");
    form.append(&basic);
    form.append(&pro);
    form.append(&team);
    basic.set_required(true);
    team.set_attribute("x-validate", "{}");

    let _form = plugin.validate_form(form.clone(), &Value::Null).unwrap();
    let field = plugin
        .validate(basic.clone(), &expression(json!({ "m": { "valueMissing": "Pick a plan" } })))
        .unwrap();

    assert_eq!(pro.listener_count("change"), 0);
    form.dispatch_event(&Event::new("submit"));
    assert_eq!(plugin.message_store().get(&*basic), "Pick a plan");
    assert_eq!(pro.listener_count("change"), 1);
    assert_eq!(team.listener_count("change"), 0);

    // A second submission does not attach twice
    form.dispatch_event(&Event::new("submit"));
    assert_eq!(pro.listener_count("change"), 1);

    pro.set_checked(true);
    pro.dispatch_event(&Event::new("change"));
    assert_eq!(plugin.message_store().get(&*basic), "");

    field.cleanup();
    assert_eq!(pro.listener_count("change"), 0);
    assert_eq!(basic.listener_count("change"), 0);
}

#[test]
fn test_radio_without_form_logs_instead_of_panicking() {
    init_tracing();
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let radio = doc.create_control(ControlKind::Radio, "lonely", "lonely");
    let events = record_events(&*radio, &["x-validate:success", "x-validate:failed"]);

    let _field = plugin.validate(radio.clone(), &Value::Null).unwrap();
    radio.set_checked(true);
    radio.dispatch_event(&Event::new("change"));
    assert!(events.borrow().is_empty());
}

// ============================================================================
// Event policies
// ============================================================================

#[test]
fn test_blur_only_policy_with_hooks() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Text), "city", "city");

    let calls = Rc::new(RefCell::new(Vec::new()));
    let (before_log, after_log) = (calls.clone(), calls.clone());
    let config = Value::object([
        ("onChange", Value::from(false)),
        (
            "onBlur",
            Value::object([
                (
                    "before",
                    Function::hook(move |_| before_log.borrow_mut().push("before")),
                ),
                (
                    "after",
                    Function::hook(move |_| after_log.borrow_mut().push("after")),
                ),
            ]),
        ),
    ]);
    let _field = plugin.validate(input.clone(), &config).unwrap();

    assert_eq!(input.listener_count("change"), 0);
    assert_eq!(input.listener_count("blur"), 1);
    input.dispatch_event(&Event::new("blur"));
    assert_eq!(*calls.borrow(), vec!["before", "after"]);
}

#[test]
fn test_change_is_fallback_when_everything_off() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Text), "city", "city");

    let config = expression(json!({ "onChange": false, "onBlur": false, "onInput": false }));
    let _field = plugin.validate(input.clone(), &config).unwrap();
    assert_eq!(input.listener_count("change"), 1);
}

// ============================================================================
// Message display
// ============================================================================

#[test]
fn test_message_for_renders_store_changes() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Email), "email", "email");
    input.set_value("not-an-email");

    let rendered = Rc::new(RefCell::new(Vec::new()));
    let sink = rendered.clone();
    let display = plugin.validate_message_for(doc.clone() as Rc<dyn Document>, "#email", move |text| {
        sink.borrow_mut().push(text.to_string())
    });
    assert_eq!(rendered.borrow().last().map(String::as_str), Some(""));

    let _field = plugin
        .validate(input.clone(), &expression(json!({ "m": { "typeMismatch": "Invalid email" } })))
        .unwrap();
    input.dispatch_event(&Event::new("change"));
    assert_eq!(rendered.borrow().last().map(String::as_str), Some("Invalid email"));

    display.cleanup();
    let count = rendered.borrow().len();
    input.set_value("jane@example.com");
    input.dispatch_event(&Event::new("change"));
    assert_eq!(rendered.borrow().len(), count);
}

#[test]
fn test_message_for_unknown_selector_renders_empty() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let rendered = Rc::new(RefCell::new(None));
    let sink = rendered.clone();
    let _display = plugin.validate_message_for(doc as Rc<dyn Document>, "#missing", move |text| {
        *sink.borrow_mut() = Some(text.to_string())
    });
    assert_eq!(*rendered.borrow(), Some(String::new()));
}

// ============================================================================
// Lifecycle and setup errors
// ============================================================================

#[test]
fn test_cleanup_detaches_everything() {
    init_tracing();
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let form = doc.create_form("profile");
    let name = text_field(&doc, &form, "name");

    let form_directive = plugin.validate_form(form.clone(), &Value::Null).unwrap();
    let field = plugin
        .validate(name.clone(), &expression(json!({ "onBlur": true })))
        .unwrap();

    assert_eq!(plugin.message_store().len(), 1);
    assert_eq!(plugin.registry().field_count(), 1);
    assert_eq!(name.listener_count("blur"), 1);
    assert_eq!(form.listener_count("submit"), 1);

    drop(field);
    assert_eq!(plugin.message_store().len(), 0);
    assert_eq!(plugin.registry().field_count(), 0);
    assert_eq!(name.listener_count("blur"), 0);
    assert_eq!(name.listener_count("change"), 0);

    form_directive.cleanup();
    assert_eq!(form.listener_count("submit"), 0);
    assert!(form.dispatch_event(&Event::new("submit")));
}

#[test]
fn test_missing_identity_is_rejected() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let unnamed = doc.create_control(ControlKind::Text(InputType::Text), "field", "");
    let anonymous = doc.create_control(ControlKind::Text(InputType::Text), "", "field");

    assert!(matches!(
        plugin.validate(unnamed, &Value::Null),
        Err(ValidateError::MissingIdentity)
    ));
    assert!(matches!(
        plugin.validate(anonymous, &Value::Null),
        Err(ValidateError::MissingIdentity)
    ));
    assert!(plugin.message_store().is_empty());
}

#[test]
fn test_setup_errors_propagate() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Text), "zip", "zip");

    let err = plugin
        .validate(input.clone(), &expression(json!({ "v": { "format": { "v": "[0-9]{5}" } } })))
        .err()
        .map(|e| e.to_string());
    assert_eq!(err.as_deref(), Some("Message undefined. validation key: format"));

    let err = plugin
        .validate(input.clone(), &expression(json!({ "onInput": true, "inputLimit": "sample:10" })))
        .err()
        .map(|e| e.to_string());
    assert_eq!(err.as_deref(), Some("Input rate limiter not found: sample."));
    assert_eq!(input.listener_count("change"), 0);
}

#[test]
fn test_oversized_input_limit_wait_is_a_setup_error() {
    let plugin = ValidatePlugin::default();
    let doc = HeadlessDocument::new();
    let input = doc.create_control(ControlKind::Text(InputType::Text), "q", "q");

    for limit in ["debounce:1e300", "throttle:1e300"] {
        let result = plugin.validate(
            input.clone(),
            &expression(json!({ "onInput": true, "inputLimit": limit })),
        );
        assert!(
            matches!(result, Err(ValidateError::InvalidRateLimitWait { .. })),
            "{limit}"
        );
    }
    assert_eq!(input.listener_count("input"), 0);
    assert_eq!(plugin.registry().field_count(), 0);
    assert!(plugin.message_store().is_empty());
}
