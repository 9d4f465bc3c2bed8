// File: rusty-forms-validate/src/functions/message_store.rs
// Purpose: Current validation message per field, re-resolved on source updates

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;

use super::{MessageResolver, UpdateListener};
use crate::dom::Control;
use crate::reactive::Listeners;
use crate::value::Value;

/// Receives every newly resolved message of one field
pub type MessageHandler = Rc<dyn Fn(&str)>;

struct Entry {
    params: Vec<Value>,
    value: String,
    on_change: MessageHandler,
}

/// Shared message store keyed by element id.
///
/// Every attached field owns one entry. When the resolver announces an
/// update, entries with params or a non-empty message are resolved again and
/// their handlers called, so displayed messages follow a locale switch
/// without the fields validating again.
pub struct MessageStore {
    resolver: Rc<dyn MessageResolver>,
    entries: RefCell<IndexMap<String, Entry>>,
    subscribers: Listeners<dyn Fn()>,
    update_listener: RefCell<Option<UpdateListener>>,
}

impl MessageStore {
    pub fn new(resolver: Rc<dyn MessageResolver>) -> Rc<Self> {
        let store = Rc::new(Self {
            resolver: resolver.clone(),
            entries: RefCell::new(IndexMap::new()),
            subscribers: Listeners::new(),
            update_listener: RefCell::new(None),
        });

        let weak: Weak<Self> = Rc::downgrade(&store);
        let listener: UpdateListener = Rc::new(move || {
            if let Some(store) = weak.upgrade() {
                store.refresh();
            }
        });
        resolver.add_update_listener(listener.clone());
        *store.update_listener.borrow_mut() = Some(listener);
        store
    }

    /// Register a field with no message; `on_change("")` runs immediately
    pub fn create(&self, control: &dyn Control, on_change: impl Fn(&str) + 'static) {
        let on_change: MessageHandler = Rc::new(on_change);
        self.entries.borrow_mut().insert(
            control.id(),
            Entry {
                params: Vec::new(),
                value: String::new(),
                on_change: on_change.clone(),
            },
        );
        on_change("");
        self.subscribers.notify();
    }

    /// Resolve and store `params` as the field's message
    pub fn set(&self, control: &dyn Control, params: Vec<Value>) {
        let value = self.resolver.resolve(&params);
        self.update(&control.id(), params, value);
    }

    /// Reset the field to "no message"
    pub fn clear(&self, control: &dyn Control) {
        self.update(&control.id(), Vec::new(), String::new());
    }

    /// The field's current message, `""` when it has no entry
    pub fn get(&self, control: &dyn Control) -> String {
        self.get_by_id(&control.id())
    }

    pub fn get_by_id(&self, id: &str) -> String {
        self.entries
            .borrow()
            .get(id)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    /// Message parameters behind the field's current message
    pub fn params(&self, control: &dyn Control) -> Vec<Value> {
        self.entries
            .borrow()
            .get(&control.id())
            .map(|e| e.params.clone())
            .unwrap_or_default()
    }

    /// `on_change("")`, then drop the entry
    pub fn delete(&self, control: &dyn Control) {
        let id = control.id();
        let handler = self.entries.borrow().get(&id).map(|e| e.on_change.clone());
        if let Some(handler) = handler {
            handler("");
        }
        self.entries.borrow_mut().shift_remove(&id);
        self.subscribers.notify();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Called after every change to any entry
    pub fn subscribe(&self, listener: Rc<dyn Fn()>) {
        self.subscribers.add(listener);
    }

    pub fn unsubscribe(&self, listener: &Rc<dyn Fn()>) {
        self.subscribers.remove(listener);
    }

    fn update(&self, id: &str, params: Vec<Value>, value: String) {
        let handler = {
            let mut entries = self.entries.borrow_mut();
            let Some(entry) = entries.get_mut(id) else {
                debug!(id = %id, "message update for a field without an entry");
                return;
            };
            entry.params = params;
            entry.value = value.clone();
            entry.on_change.clone()
        };
        handler(&value);
        self.subscribers.notify();
    }

    /// Re-resolve entries that show or hold a message
    fn refresh(&self) {
        let stale: Vec<(String, Vec<Value>)> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, e)| !e.value.is_empty() || !e.params.is_empty())
            .map(|(id, e)| (id.clone(), e.params.clone()))
            .collect();
        if stale.is_empty() {
            return;
        }

        debug!(count = stale.len(), "re-resolving validation messages");
        for (id, params) in stale {
            let value = self.resolver.resolve(&params);
            let handler = {
                let mut entries = self.entries.borrow_mut();
                let Some(entry) = entries.get_mut(&id) else {
                    continue;
                };
                entry.value = value.clone();
                entry.on_change.clone()
            };
            handler(&value);
        }
        self.subscribers.notify();
    }
}

impl Drop for MessageStore {
    fn drop(&mut self) {
        if let Some(listener) = self.update_listener.borrow_mut().take() {
            self.resolver.remove_update_listener(&listener);
        }
    }
}
