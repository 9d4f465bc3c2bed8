// File: rusty-forms-i18n/src/catalog.rs
// Purpose: In-memory translation catalog with fallback languages

//! A small [`I18n`] provider.
//!
//! Strings are stored per language under dotted keys. Lookups walk the
//! active language and then the fallback chain, and `{{name}}` placeholders
//! are filled from the options object in a single pass.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

use crate::provider::{I18n, I18nEvent, Options, TransKey};

#[derive(Default)]
struct CatalogState {
    language: String,
    fallback: Vec<String>,
    resources: HashMap<String, HashMap<String, String>>,
}

/// Translations for any number of languages
#[derive(Default)]
pub struct Catalog {
    state: RefCell<CatalogState>,
    callbacks: RefCell<Vec<(I18nEvent, Rc<dyn Fn()>)>>,
}

impl Catalog {
    pub fn new(language: impl Into<String>) -> Rc<Self> {
        let catalog = Self::default();
        catalog.state.borrow_mut().language = language.into();
        Rc::new(catalog)
    }

    /// Languages consulted, in order, when the active one lacks a key
    pub fn set_fallback_chain(&self, chain: Vec<String>) {
        self.state.borrow_mut().fallback = chain;
    }

    /// Switch the active language
    pub fn change_language(&self, language: impl Into<String>) {
        let language = language.into();
        debug!(language = %language, "language changed");
        self.state.borrow_mut().language = language;
        self.emit(I18nEvent::LanguageChanged);
    }

    /// Load a whole resource tree for `language`. Nested objects become
    /// dotted keys; non-string leaves are skipped.
    pub fn load(&self, language: &str, resources: &serde_json::Value) {
        let mut flat = Vec::new();
        flatten("", resources, &mut flat);
        let count = flat.len();
        {
            let mut state = self.state.borrow_mut();
            let strings = state.resources.entry(language.to_string()).or_default();
            strings.extend(flat);
        }
        debug!(language, count, "resources loaded");
        self.emit(I18nEvent::Loaded);
    }

    /// Add or replace a single string
    pub fn add(&self, language: &str, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .resources
            .entry(language.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.emit(I18nEvent::Added);
    }

    /// Remove a single string; removing a missing key still notifies
    pub fn remove(&self, language: &str, key: &str) {
        if let Some(strings) = self.state.borrow_mut().resources.get_mut(language) {
            strings.remove(key);
        }
        self.emit(I18nEvent::Removed);
    }

    /// Known languages, sorted
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.state.borrow().resources.keys().cloned().collect();
        languages.sort();
        languages
    }

    fn lookup(&self, key: &TransKey) -> Option<String> {
        let state = self.state.borrow();
        let chain = std::iter::once(&state.language).chain(state.fallback.iter());
        for language in chain {
            let Some(strings) = state.resources.get(language) else {
                continue;
            };
            if let Some(found) = key.candidates().find_map(|k| strings.get(k)) {
                return Some(found.clone());
            }
        }
        None
    }

    fn emit(&self, event: I18nEvent) {
        let callbacks: Vec<Rc<dyn Fn()>> = self
            .callbacks
            .borrow()
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl I18n for Catalog {
    fn t(&self, key: &TransKey, options: Option<&Options>) -> String {
        match self.lookup(key) {
            Some(template) => interpolate(&template, options),
            None => {
                trace!(key = %key, "missing translation");
                key.primary().to_string()
            }
        }
    }

    fn exists(&self, key: &TransKey) -> bool {
        self.lookup(key).is_some()
    }

    fn on(&self, event: I18nEvent, callback: Rc<dyn Fn()>) {
        self.callbacks.borrow_mut().push((event, callback));
    }

    fn off(&self, event: I18nEvent, callback: &Rc<dyn Fn()>) {
        self.callbacks
            .borrow_mut()
            .retain(|(e, cb)| !(*e == event && Rc::ptr_eq(cb, callback)));
    }

    fn language(&self) -> String {
        self.state.borrow().language.clone()
    }
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, child, out);
            }
        }
        serde_json::Value::String(s) if !prefix.is_empty() => out.push((prefix.to_string(), s.clone())),
        _ => {}
    }
}

/// Replace `{{name}}` with `options[name]`. Unknown placeholders stay as-is.
pub fn interpolate(template: &str, options: Option<&Options>) -> String {
    let Some(serde_json::Value::Object(values)) = options else {
        return template.to_string();
    };

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after[..end].trim();
        match values.get(name) {
            Some(serde_json::Value::String(s)) => out.push_str(s),
            Some(serde_json::Value::Null) | None => out.push_str(&rest[start..start + 2 + end + 2]),
            Some(other) => out.push_str(&other.to_string()),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}
