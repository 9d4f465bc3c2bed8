// File: rusty-forms-i18n/src/resolver.rs
// Purpose: Message resolver that translates `[key, options]` params

use rusty_forms_validate::functions::{MessageResolver, UpdateListener};
use rusty_forms_validate::reactive::{Listeners, Watcher};
use rusty_forms_validate::Value;
use std::rc::Rc;
use tracing::trace;

use crate::provider::TransKey;
use crate::store::I18nStore;

/// Resolves validation messages through the store's provider.
///
/// Message params are `[key]` or `[key, options]`, where `key` is a string
/// or a list of candidate keys. An untranslated key is shown as-is. Every
/// timestamp change is announced to the update listeners, so a message store
/// built on this resolver re-renders on a language switch.
pub struct I18nMessageResolver {
    store: Rc<I18nStore>,
    listeners: Rc<Listeners<dyn Fn()>>,
    watcher: Watcher<i64>,
}

impl I18nMessageResolver {
    pub fn new(store: Rc<I18nStore>) -> Rc<Self> {
        let listeners: Rc<Listeners<dyn Fn()>> = Rc::new(Listeners::new());
        let watcher = {
            let listeners = listeners.clone();
            store.timestamp().watch(move |_, _| {
                trace!(listeners = listeners.len(), "translations changed");
                listeners.notify();
            })
        };
        Rc::new(Self {
            store,
            listeners,
            watcher,
        })
    }
}

impl MessageResolver for I18nMessageResolver {
    fn resolve(&self, params: &[Value]) -> String {
        let Some(key) = params.first().and_then(trans_key) else {
            return params.first().map(ToString::to_string).unwrap_or_default();
        };
        let i18n = self.store.i18n();
        if i18n.exists(&key) {
            let options = params.get(1).and_then(Value::to_json);
            i18n.t(&key, options.as_ref())
        } else {
            key.primary().to_string()
        }
    }

    fn add_update_listener(&self, listener: UpdateListener) {
        self.listeners.add(listener);
    }

    fn remove_update_listener(&self, listener: &UpdateListener) {
        self.listeners.remove(listener);
    }
}

impl Drop for I18nMessageResolver {
    fn drop(&mut self) {
        self.store.timestamp().unwatch(&self.watcher);
    }
}

/// Strings and lists of strings name translation keys
fn trans_key(value: &Value) -> Option<TransKey> {
    match value {
        Value::String(key) => Some(TransKey::One(key.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(TransKey::Many),
        _ => None,
    }
}
