// File: rusty-forms-validate/src/dom/mod.rs
// Purpose: The DOM seam - traits for the controls, forms and events validation runs against

//! The validation core never touches a concrete DOM. Browser bindings (or the
//! bundled [`headless`] document) implement these traits.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[cfg(feature = "headless")]
pub mod headless;

/// Stable identity of a node, independent of its `id` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Event listener
pub type Listener = Rc<dyn Fn(&Event)>;
pub type TargetRef = Rc<dyn EventTarget>;
pub type ControlRef = Rc<dyn Control>;
pub type FormRef = Rc<dyn Form>;

/// A dispatched event. Clones share the same `default_prevented` flag.
#[derive(Clone)]
pub struct Event(Rc<EventInner>);

struct EventInner {
    kind: String,
    default_prevented: Cell<bool>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(Rc::new(EventInner {
            kind: kind.into(),
            default_prevented: Cell::new(false),
        }))
    }

    /// Event type name, e.g. `"change"` or `"x-validate:failed"`
    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    pub fn prevent_default(&self) {
        self.0.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.0.default_prevented.get()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.0.kind)
            .field("default_prevented", &self.0.default_prevented.get())
            .finish()
    }
}

/// Anything listeners can be attached to
pub trait EventTarget {
    fn node_id(&self) -> NodeId;

    /// Adding the same listener (by `Rc` identity) twice has no effect
    fn add_event_listener(&self, event: &str, listener: Listener);

    fn remove_event_listener(&self, event: &str, listener: &Listener);

    /// Returns `false` when a listener called `prevent_default`
    fn dispatch_event(&self, event: &Event) -> bool;
}

/// `<input type=...>` flavours that matter for constraint validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Search,
    Tel,
    Password,
    Email,
    Url,
    Number,
    Range,
    Date,
    Time,
    Hidden,
}

impl InputType {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "search" => Self::Search,
            "tel" => Self::Tel,
            "password" => Self::Password,
            "email" => Self::Email,
            "url" => Self::Url,
            "number" => Self::Number,
            "range" => Self::Range,
            "date" => Self::Date,
            "time" => Self::Time,
            "hidden" => Self::Hidden,
            _ => Self::Text,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Range)
    }
}

/// Closed set of control kinds. Value resolution dispatches on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Text(InputType),
    TextArea,
    Radio,
    Checkbox,
    File,
    Select { multiple: bool },
}

impl ControlKind {
    /// The `type` attribute value for inputs, the tag name otherwise
    pub fn type_name(&self) -> &'static str {
        match self {
            ControlKind::Text(_) => "text",
            ControlKind::TextArea => "textarea",
            ControlKind::Radio => "radio",
            ControlKind::Checkbox => "checkbox",
            ControlKind::File => "file",
            ControlKind::Select { multiple: false } => "select-one",
            ControlKind::Select { multiple: true } => "select-multiple",
        }
    }

    /// Radio and checkbox inputs validate as a same-name group
    pub fn is_grouped(&self) -> bool {
        matches!(self, ControlKind::Radio | ControlKind::Checkbox)
    }
}

/// A selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }
}

/// Native constraint-violation reasons, in message precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidityKey {
    ValueMissing,
    TypeMismatch,
    PatternMismatch,
    TooLong,
    TooShort,
    RangeUnderflow,
    RangeOverflow,
    StepMismatch,
    BadInput,
}

impl ValidityKey {
    /// Fixed precedence used when picking a configured message
    pub const ORDER: [ValidityKey; 9] = [
        ValidityKey::ValueMissing,
        ValidityKey::TypeMismatch,
        ValidityKey::PatternMismatch,
        ValidityKey::TooLong,
        ValidityKey::TooShort,
        ValidityKey::RangeUnderflow,
        ValidityKey::RangeOverflow,
        ValidityKey::StepMismatch,
        ValidityKey::BadInput,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidityKey::ValueMissing => "valueMissing",
            ValidityKey::TypeMismatch => "typeMismatch",
            ValidityKey::PatternMismatch => "patternMismatch",
            ValidityKey::TooLong => "tooLong",
            ValidityKey::TooShort => "tooShort",
            ValidityKey::RangeUnderflow => "rangeUnderflow",
            ValidityKey::RangeOverflow => "rangeOverflow",
            ValidityKey::StepMismatch => "stepMismatch",
            ValidityKey::BadInput => "badInput",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ORDER.iter().copied().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for ValidityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a control's `ValidityState`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityState {
    pub value_missing: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
    pub too_long: bool,
    pub too_short: bool,
    pub range_underflow: bool,
    pub range_overflow: bool,
    pub step_mismatch: bool,
    pub bad_input: bool,
    pub custom_error: bool,
}

impl ValidityState {
    pub fn get(&self, key: ValidityKey) -> bool {
        match key {
            ValidityKey::ValueMissing => self.value_missing,
            ValidityKey::TypeMismatch => self.type_mismatch,
            ValidityKey::PatternMismatch => self.pattern_mismatch,
            ValidityKey::TooLong => self.too_long,
            ValidityKey::TooShort => self.too_short,
            ValidityKey::RangeUnderflow => self.range_underflow,
            ValidityKey::RangeOverflow => self.range_overflow,
            ValidityKey::StepMismatch => self.step_mismatch,
            ValidityKey::BadInput => self.bad_input,
        }
    }

    pub fn valid(&self) -> bool {
        !self.custom_error && !ValidityKey::ORDER.iter().any(|k| self.get(*k))
    }
}

/// A form control under validation
pub trait Control: EventTarget {
    fn id(&self) -> String;
    fn name(&self) -> String;
    fn kind(&self) -> ControlKind;

    /// Raw `value` (for selects: the first selected option's value)
    fn value(&self) -> String;
    fn checked(&self) -> bool;
    /// Values of the selected `<option>`s, in document order
    fn selected_values(&self) -> Vec<String>;
    fn files(&self) -> Vec<FileInfo>;

    fn required(&self) -> bool;
    fn has_attribute(&self, name: &str) -> bool;

    fn validity(&self) -> ValidityState;
    fn validation_message(&self) -> String;
    fn check_validity(&self) -> bool;
    /// Like `check_validity`, and also surfaces the platform validation UI
    fn report_validity(&self) -> bool;
    fn set_custom_validity(&self, message: &str);

    fn form(&self) -> Option<FormRef>;

    fn as_event_target(self: Rc<Self>) -> TargetRef;
}

/// A form container
pub trait Form: EventTarget {
    fn id(&self) -> String;
    /// Listed controls in document order
    fn elements(&self) -> Vec<ControlRef>;
    fn check_validity(&self) -> bool;
    fn report_validity(&self) -> bool;

    fn as_event_target(self: Rc<Self>) -> TargetRef;
}

/// Selector lookup used by the message display directive
pub trait Document {
    fn query_selector(&self, selector: &str) -> Option<ControlRef>;
}
