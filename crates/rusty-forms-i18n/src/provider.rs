// File: rusty-forms-i18n/src/provider.rs
// Purpose: The translation provider seam

use std::fmt;
use std::rc::Rc;

/// Translation options, e.g. `{"count": 3}` for interpolation
pub type Options = serde_json::Value;

/// A single key, or candidates tried in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransKey {
    One(String),
    Many(Vec<String>),
}

impl TransKey {
    /// Candidate keys in lookup order
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        let keys: &[String] = match self {
            TransKey::One(key) => std::slice::from_ref(key),
            TransKey::Many(keys) => keys,
        };
        keys.iter().map(String::as_str)
    }

    /// The key shown when nothing translates it
    pub fn primary(&self) -> &str {
        self.candidates().next().unwrap_or("")
    }
}

impl From<&str> for TransKey {
    fn from(key: &str) -> Self {
        TransKey::One(key.to_string())
    }
}

impl From<String> for TransKey {
    fn from(key: String) -> Self {
        TransKey::One(key)
    }
}

impl From<Vec<String>> for TransKey {
    fn from(keys: Vec<String>) -> Self {
        TransKey::Many(keys)
    }
}

impl fmt::Display for TransKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.primary())
    }
}

/// Provider events that can change what `t` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum I18nEvent {
    LanguageChanged,
    Loaded,
    Added,
    Removed,
}

impl I18nEvent {
    pub const ALL: [I18nEvent; 4] = [
        I18nEvent::LanguageChanged,
        I18nEvent::Loaded,
        I18nEvent::Added,
        I18nEvent::Removed,
    ];
}

/// A translation provider
pub trait I18n {
    /// Translate `key`; a missing key translates to itself
    fn t(&self, key: &TransKey, options: Option<&Options>) -> String;

    fn exists(&self, key: &TransKey) -> bool;

    /// Run `callback` after every `event`
    fn on(&self, event: I18nEvent, callback: Rc<dyn Fn()>);

    /// Remove a callback registered with [`I18n::on`], matched by identity
    fn off(&self, event: I18nEvent, callback: &Rc<dyn Fn()>);

    /// Active language
    fn language(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trans_key_candidates() {
        let one = TransKey::from("errors.required");
        assert_eq!(one.candidates().collect::<Vec<_>>(), vec!["errors.required"]);
        assert_eq!(one.to_string(), "errors.required");

        let many = TransKey::from(vec!["errors.email".to_string(), "errors.generic".to_string()]);
        assert_eq!(many.primary(), "errors.email");
        assert_eq!(many.candidates().count(), 2);

        assert_eq!(TransKey::Many(Vec::new()).primary(), "");
    }
}
