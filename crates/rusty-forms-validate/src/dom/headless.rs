// File: rusty-forms-validate/src/dom/headless.rs
// Purpose: In-memory document with HTML5 constraint validation

//! A small headless DOM that implements the [`Control`]/[`Form`] seam.
//!
//! It models what validation needs and nothing more: attributes, values,
//! checked state, selected options and files, listeners, custom validity and
//! the native constraint checks (`required`, `type`, `pattern`,
//! `minlength`/`maxlength`, `min`/`max`/`step`, bad numeric input).
//!
//! ```rust
//! use rusty_forms_validate::dom::{Control, ControlKind, InputType};
//! use rusty_forms_validate::dom::headless::HeadlessDocument;
//!
//! let doc = HeadlessDocument::new();
//! let form = doc.create_form("signup");
//! let email = doc.create_control(ControlKind::Text(InputType::Email), "email", "email");
//! form.append(&email);
//!
//! email.set_attribute("required", "");
//! assert!(!email.check_validity());
//! email.set_value("someone@example.com");
//! assert!(email.check_validity());
//! ```

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::{
    Control, ControlKind, ControlRef, Document, Event, EventTarget, FileInfo, Form, FormRef,
    InputType, Listener, NodeId, TargetRef, ValidityKey, ValidityState,
};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:\S+$").expect("url pattern compiles"));

/// Listener table shared by headless nodes
#[derive(Default)]
struct ListenerMap {
    entries: RefCell<Vec<(String, Listener)>>,
}

impl ListenerMap {
    fn add(&self, event: &str, listener: Listener) {
        let mut entries = self.entries.borrow_mut();
        let exists = entries
            .iter()
            .any(|(name, l)| name == event && Rc::ptr_eq(l, &listener));
        if !exists {
            entries.push((event.to_string(), listener));
        }
    }

    fn remove(&self, event: &str, listener: &Listener) {
        self.entries
            .borrow_mut()
            .retain(|(name, l)| !(name == event && Rc::ptr_eq(l, listener)));
    }

    fn count(&self, event: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .count()
    }

    fn dispatch(&self, event: &Event) -> bool {
        // Snapshot so listeners may add/remove listeners while running
        let matching: Vec<Listener> = self
            .entries
            .borrow()
            .iter()
            .filter(|(name, _)| name == event.kind())
            .map(|(_, l)| l.clone())
            .collect();
        for listener in matching {
            listener(event);
        }
        !event.default_prevented()
    }
}

/// An `<option>` of a headless select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

#[derive(Default)]
struct ControlState {
    attributes: IndexMap<String, String>,
    value: String,
    checked: bool,
    options: Vec<SelectOption>,
    files: Vec<FileInfo>,
    custom_message: String,
}

/// Owns every node created through it and answers selector queries
pub struct HeadlessDocument {
    next_id: Cell<u64>,
    controls: RefCell<Vec<Rc<HeadlessControl>>>,
    forms: RefCell<Vec<Rc<HeadlessForm>>>,
}

impl HeadlessDocument {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            next_id: Cell::new(1),
            controls: RefCell::new(Vec::new()),
            forms: RefCell::new(Vec::new()),
        })
    }

    fn allocate(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    /// Create an empty `<form>`
    pub fn create_form(&self, id: &str) -> Rc<HeadlessForm> {
        let form = Rc::new(HeadlessForm {
            node_id: self.allocate(),
            id: id.to_string(),
            controls: RefCell::new(Vec::new()),
            listeners: ListenerMap::default(),
            reports: Cell::new(0),
        });
        self.forms.borrow_mut().push(form.clone());
        form
    }

    /// Create a detached control; use [`HeadlessForm::append`] to give it a form
    pub fn create_control(&self, kind: ControlKind, id: &str, name: &str) -> Rc<HeadlessControl> {
        let mut state = ControlState::default();
        if !id.is_empty() {
            state.attributes.insert("id".to_string(), id.to_string());
        }
        if !name.is_empty() {
            state.attributes.insert("name".to_string(), name.to_string());
        }
        if matches!(kind, ControlKind::Radio | ControlKind::Checkbox) {
            // Browsers default checkable inputs to "on"
            state.value = "on".to_string();
        }
        let control = Rc::new(HeadlessControl {
            node_id: self.allocate(),
            kind,
            state: RefCell::new(state),
            form: RefCell::new(Weak::new()),
            listeners: ListenerMap::default(),
            reports: Cell::new(0),
        });
        self.controls.borrow_mut().push(control.clone());
        control
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Rc<HeadlessControl>> {
        self.controls
            .borrow()
            .iter()
            .find(|c| c.attribute("id").as_deref() == Some(id))
            .cloned()
    }
}

impl Document for HeadlessDocument {
    /// Supports `#id` and `[name="..."]` selectors
    fn query_selector(&self, selector: &str) -> Option<ControlRef> {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            return self.get_element_by_id(id).map(|c| c as ControlRef);
        }
        let name = selector
            .strip_prefix("[name=")
            .and_then(|rest| rest.strip_suffix(']'))
            .map(|n| n.trim_matches(|c| c == '"' || c == '\''))?;
        self.controls
            .borrow()
            .iter()
            .find(|c| c.attribute("name").as_deref() == Some(name))
            .cloned()
            .map(|c| c as ControlRef)
    }
}

/// A headless `<form>`
pub struct HeadlessForm {
    node_id: NodeId,
    id: String,
    controls: RefCell<Vec<Rc<HeadlessControl>>>,
    listeners: ListenerMap,
    reports: Cell<usize>,
}

impl HeadlessForm {
    /// Append a control; it now resolves this form as its owner
    pub fn append(self: &Rc<Self>, control: &Rc<HeadlessControl>) {
        *control.form.borrow_mut() = Rc::downgrade(self);
        self.controls.borrow_mut().push(control.clone());
    }

    /// How many times `report_validity` was called on the form
    pub fn reports(&self) -> usize {
        self.reports.get()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.count(event)
    }

    fn same_name(&self, kind: ControlKind, name: &str) -> Vec<Rc<HeadlessControl>> {
        self.controls
            .borrow()
            .iter()
            .filter(|c| c.kind == kind && c.attribute("name").as_deref() == Some(name))
            .cloned()
            .collect()
    }
}

impl EventTarget for HeadlessForm {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn add_event_listener(&self, event: &str, listener: Listener) {
        self.listeners.add(event, listener);
    }

    fn remove_event_listener(&self, event: &str, listener: &Listener) {
        self.listeners.remove(event, listener);
    }

    fn dispatch_event(&self, event: &Event) -> bool {
        self.listeners.dispatch(event)
    }
}

impl Form for HeadlessForm {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn elements(&self) -> Vec<ControlRef> {
        self.controls
            .borrow()
            .iter()
            .map(|c| c.clone() as ControlRef)
            .collect()
    }

    fn check_validity(&self) -> bool {
        let controls: Vec<Rc<HeadlessControl>> = self.controls.borrow().clone();
        // Every control is checked so each invalid one fires `invalid`
        controls
            .iter()
            .map(|c| c.check_validity())
            .fold(true, |all, valid| all && valid)
    }

    fn report_validity(&self) -> bool {
        self.reports.set(self.reports.get() + 1);
        self.check_validity()
    }

    fn as_event_target(self: Rc<Self>) -> TargetRef {
        self
    }
}

/// A headless `<input>`, `<textarea>` or `<select>`
pub struct HeadlessControl {
    node_id: NodeId,
    kind: ControlKind,
    state: RefCell<ControlState>,
    form: RefCell<Weak<HeadlessForm>>,
    listeners: ListenerMap,
    reports: Cell<usize>,
}

impl HeadlessControl {
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.state.borrow_mut().attributes.shift_remove(name);
    }

    pub fn set_required(&self, required: bool) {
        if required {
            self.set_attribute("required", "");
        } else {
            self.remove_attribute("required");
        }
    }

    pub fn set_value(&self, value: &str) {
        self.state.borrow_mut().value = value.to_string();
    }

    /// Checking a radio unchecks the other same-name radios of its form
    pub fn set_checked(&self, checked: bool) {
        if checked && self.kind == ControlKind::Radio {
            if let (Some(form), Some(name)) = (self.form.borrow().upgrade(), self.attribute("name")) {
                for other in form.same_name(ControlKind::Radio, &name) {
                    if other.node_id != self.node_id {
                        other.state.borrow_mut().checked = false;
                    }
                }
            }
        }
        self.state.borrow_mut().checked = checked;
    }

    /// Append an `<option>` to a select
    pub fn add_option(&self, value: &str, selected: bool) {
        self.state.borrow_mut().options.push(SelectOption {
            value: value.to_string(),
            selected,
        });
    }

    /// Select exactly the given option values
    pub fn select(&self, values: &[&str]) {
        let multiple = matches!(self.kind, ControlKind::Select { multiple: true });
        let mut state = self.state.borrow_mut();
        let mut picked = false;
        for option in state.options.iter_mut() {
            option.selected = values.contains(&option.value.as_str()) && (multiple || !picked);
            picked |= option.selected;
        }
    }

    pub fn set_files(&self, files: Vec<FileInfo>) {
        self.state.borrow_mut().files = files;
    }

    /// How many times `report_validity` was called on this control
    pub fn reports(&self) -> usize {
        self.reports.get()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.count(event)
    }

    fn group_has_checked(&self, state: &ControlState) -> bool {
        if state.checked {
            return true;
        }
        let (Some(form), Some(name)) = (self.form.borrow().upgrade(), state.attributes.get("name").cloned())
        else {
            return false;
        };
        form.same_name(self.kind, &name)
            .iter()
            .filter(|c| c.node_id != self.node_id)
            .any(|c| c.state.borrow().checked)
    }

    fn compute_validity(&self) -> ValidityState {
        let state = self.state.borrow();
        let mut validity = ValidityState {
            custom_error: !state.custom_message.is_empty(),
            ..Default::default()
        };
        let required = state.attributes.contains_key("required");

        match self.kind {
            ControlKind::Radio => {
                validity.value_missing = required && !self.group_has_checked(&state);
            }
            ControlKind::Checkbox => {
                validity.value_missing = required && !state.checked;
            }
            ControlKind::File => {
                validity.value_missing = required && state.files.is_empty();
            }
            ControlKind::Select { .. } => {
                validity.value_missing = required
                    && !state
                        .options
                        .iter()
                        .any(|o| o.selected && !o.value.is_empty());
            }
            ControlKind::TextArea => {
                validity.value_missing = required && state.value.is_empty();
                if !state.value.is_empty() {
                    check_length(&state, &mut validity);
                }
            }
            ControlKind::Text(input_type) => {
                validity.value_missing = required && state.value.is_empty();
                if !state.value.is_empty() {
                    check_text(input_type, &state, &mut validity);
                }
            }
        }
        validity
    }
}

fn numeric_attribute(state: &ControlState, name: &str) -> Option<f64> {
    state.attributes.get(name).and_then(|v| v.trim().parse().ok())
}

fn check_length(state: &ControlState, validity: &mut ValidityState) {
    let len = state.value.chars().count();
    if let Some(max) = numeric_attribute(state, "maxlength") {
        validity.too_long = (len as f64) > max;
    }
    if let Some(min) = numeric_attribute(state, "minlength") {
        validity.too_short = (len as f64) < min;
    }
}

fn check_text(input_type: InputType, state: &ControlState, validity: &mut ValidityState) {
    let value = state.value.as_str();

    if input_type.is_numeric() {
        let number = match value.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => n,
            _ => {
                validity.bad_input = true;
                return;
            }
        };
        let min = numeric_attribute(state, "min");
        if let Some(min) = min {
            validity.range_underflow = number < min;
        }
        if let Some(max) = numeric_attribute(state, "max") {
            validity.range_overflow = number > max;
        }
        let step = match state.attributes.get("step").map(|s| s.trim()) {
            Some(s) if s.eq_ignore_ascii_case("any") => None,
            Some(s) => s.parse::<f64>().ok().filter(|s| *s > 0.0).or(Some(1.0)),
            None => Some(1.0),
        };
        if let Some(step) = step {
            let steps = (number - min.unwrap_or(0.0)) / step;
            validity.step_mismatch = (steps - steps.round()).abs() > 1e-9;
        }
        return;
    }

    match input_type {
        InputType::Email => validity.type_mismatch = !EMAIL_PATTERN.is_match(value),
        InputType::Url => validity.type_mismatch = !URL_PATTERN.is_match(value),
        _ => {}
    }

    if let Some(pattern) = state.attributes.get("pattern") {
        // An invalid pattern is ignored, as browsers do
        if let Ok(re) = Regex::new(&format!("^(?:{})$", pattern)) {
            validity.pattern_mismatch = !re.is_match(value);
        }
    }

    check_length(state, validity);
}

fn platform_message(key: ValidityKey) -> &'static str {
    match key {
        ValidityKey::ValueMissing => "Please fill out this field.",
        ValidityKey::TypeMismatch => "Please enter a valid value.",
        ValidityKey::PatternMismatch => "Please match the requested format.",
        ValidityKey::TooLong => "Please shorten this text.",
        ValidityKey::TooShort => "Please lengthen this text.",
        ValidityKey::RangeUnderflow => "Value must be greater.",
        ValidityKey::RangeOverflow => "Value must be less.",
        ValidityKey::StepMismatch => "Please enter a valid value.",
        ValidityKey::BadInput => "Please enter a number.",
    }
}

impl EventTarget for HeadlessControl {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn add_event_listener(&self, event: &str, listener: Listener) {
        self.listeners.add(event, listener);
    }

    fn remove_event_listener(&self, event: &str, listener: &Listener) {
        self.listeners.remove(event, listener);
    }

    fn dispatch_event(&self, event: &Event) -> bool {
        self.listeners.dispatch(event)
    }
}

impl Control for HeadlessControl {
    fn id(&self) -> String {
        self.attribute("id").unwrap_or_default()
    }

    fn name(&self) -> String {
        self.attribute("name").unwrap_or_default()
    }

    fn kind(&self) -> ControlKind {
        self.kind
    }

    fn value(&self) -> String {
        let state = self.state.borrow();
        match self.kind {
            ControlKind::Select { .. } => state
                .options
                .iter()
                .find(|o| o.selected)
                .map(|o| o.value.clone())
                .unwrap_or_default(),
            _ => state.value.clone(),
        }
    }

    fn checked(&self) -> bool {
        self.state.borrow().checked
    }

    fn selected_values(&self) -> Vec<String> {
        self.state
            .borrow()
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.clone())
            .collect()
    }

    fn files(&self) -> Vec<FileInfo> {
        self.state.borrow().files.clone()
    }

    fn required(&self) -> bool {
        self.state.borrow().attributes.contains_key("required")
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.state.borrow().attributes.contains_key(name)
    }

    fn validity(&self) -> ValidityState {
        self.compute_validity()
    }

    fn validation_message(&self) -> String {
        let validity = self.compute_validity();
        if validity.custom_error {
            return self.state.borrow().custom_message.clone();
        }
        ValidityKey::ORDER
            .iter()
            .find(|k| validity.get(**k))
            .map(|k| platform_message(*k).to_string())
            .unwrap_or_default()
    }

    fn check_validity(&self) -> bool {
        let valid = self.compute_validity().valid();
        if !valid {
            self.dispatch_event(&Event::new("invalid"));
        }
        valid
    }

    fn report_validity(&self) -> bool {
        self.reports.set(self.reports.get() + 1);
        self.check_validity()
    }

    fn set_custom_validity(&self, message: &str) {
        self.state.borrow_mut().custom_message = message.to_string();
    }

    fn form(&self) -> Option<FormRef> {
        self.form
            .borrow()
            .upgrade()
            .map(|f| f as FormRef)
    }

    fn as_event_target(self: Rc<Self>) -> TargetRef {
        self
    }
}
