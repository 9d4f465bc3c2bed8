// File: rusty-forms-validate/src/registry.rs
// Purpose: Which forms and fields have validation attached

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use crate::dom::{ControlRef, Listener, NodeId};
use crate::error::Result;
use crate::utils::LimitedHandler;
use crate::validators::{FieldOutcome, FieldValidator};

/// A field directive's live state
pub struct FieldBinding {
    validator: Rc<FieldValidator>,
    events: Vec<(String, Listener)>,
    limiters: Vec<Rc<dyn LimitedHandler>>,
    /// Marks controls that carry a field directive of their own
    directive_attribute: String,
    attached_siblings: RefCell<Vec<ControlRef>>,
}

impl FieldBinding {
    pub fn new(
        validator: Rc<FieldValidator>,
        events: Vec<(String, Listener)>,
        limiters: Vec<Rc<dyn LimitedHandler>>,
        directive_attribute: impl Into<String>,
    ) -> Self {
        Self {
            validator,
            events,
            limiters,
            directive_attribute: directive_attribute.into(),
            attached_siblings: RefCell::new(Vec::new()),
        }
    }

    pub fn validator(&self) -> &Rc<FieldValidator> {
        &self.validator
    }

    /// Event names this field listens to, in registration order
    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|(name, _)| name.as_str())
    }

    /// Validate as part of a form submission.
    ///
    /// Afterwards the field stays in submission mode, and a radio or checkbox
    /// shares its handlers with the same-name controls of its form that have
    /// no validation of their own.
    pub fn submit_validate(&self, registry: &Registry) -> Result<FieldOutcome> {
        let outcome = self.validator.validate()?;
        self.validator.set_form_submit(true);

        if self.validator.control().kind().is_grouped() {
            for sibling in self.group_siblings(registry) {
                for (event, listener) in &self.events {
                    sibling.add_event_listener(event, listener.clone());
                }
                let mut attached = self.attached_siblings.borrow_mut();
                if !attached.iter().any(|c| c.node_id() == sibling.node_id()) {
                    attached.push(sibling);
                }
            }
        }
        Ok(outcome)
    }

    fn group_siblings(&self, registry: &Registry) -> Vec<ControlRef> {
        let control = self.validator.control();
        let Some(form) = control.form() else {
            return Vec::new();
        };
        let (kind, name, node) = (control.kind(), control.name(), control.node_id());
        form.elements()
            .into_iter()
            .filter(|el| {
                el.kind() == kind
                    && el.name() == name
                    && el.node_id() != node
                    && !el.has_attribute(&self.directive_attribute)
                    && !registry.contains_field(el.node_id())
            })
            .collect()
    }

    /// Start listening on the field itself
    pub(crate) fn attach(&self) {
        let control = self.validator.control();
        for (event, listener) in &self.events {
            control.add_event_listener(event, listener.clone());
        }
    }

    /// Stop listening everywhere and drop pending rate-limited calls
    pub(crate) fn detach(&self) {
        for sibling in self.attached_siblings.borrow_mut().drain(..) {
            for (event, listener) in &self.events {
                sibling.remove_event_listener(event, listener);
            }
        }
        let control = self.validator.control();
        for (event, listener) in &self.events {
            control.remove_event_listener(event, listener);
        }
        for limiter in &self.limiters {
            limiter.cancel();
        }
    }
}

/// A form directive's registry record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormEntry {
    pub report: bool,
}

/// Attached validation, keyed by node identity
#[derive(Default)]
pub struct Registry {
    fields: RefCell<HashMap<NodeId, Rc<FieldBinding>>>,
    forms: RefCell<HashMap<NodeId, FormEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_field(&self, node: NodeId, binding: Rc<FieldBinding>) {
        debug!(node = node.0, "field validation attached");
        self.fields.borrow_mut().insert(node, binding);
    }

    pub fn remove_field(&self, node: NodeId) -> Option<Rc<FieldBinding>> {
        let removed = self.fields.borrow_mut().remove(&node);
        if removed.is_some() {
            debug!(node = node.0, "field validation detached");
        }
        removed
    }

    pub fn field(&self, node: NodeId) -> Option<Rc<FieldBinding>> {
        self.fields.borrow().get(&node).cloned()
    }

    pub fn contains_field(&self, node: NodeId) -> bool {
        self.fields.borrow().contains_key(&node)
    }

    pub fn insert_form(&self, node: NodeId, entry: FormEntry) {
        self.forms.borrow_mut().insert(node, entry);
    }

    pub fn remove_form(&self, node: NodeId) -> Option<FormEntry> {
        self.forms.borrow_mut().remove(&node)
    }

    pub fn form(&self, node: NodeId) -> Option<FormEntry> {
        self.forms.borrow().get(&node).copied()
    }

    pub fn field_count(&self) -> usize {
        self.fields.borrow().len()
    }
}
