//! # rusty-forms-i18n
//!
//! Translated validation messages for `rusty-forms-validate`.
//!
//! An [`I18nStore`] wraps a translation provider and a timestamp that moves
//! whenever the provider reports a change. [`I18nPlugin`] keeps the timestamp
//! current and offers `t`/`i18n_text`; [`I18nMessageResolver`] plugs into the
//! validation message store so displayed errors follow the active language
//! without re-validating.
//!
//! ```rust
//! use rusty_forms_i18n::{Catalog, I18nMessageResolver, I18nPlugin, I18nStore};
//! use rusty_forms_validate::functions::MessageResolver;
//! use rusty_forms_validate::Value;
//! use serde_json::json;
//!
//! let catalog = Catalog::new("en");
//! catalog.load("en", &json!({ "errors": { "required": "Required" } }));
//! catalog.load("de", &json!({ "errors": { "required": "Pflichtfeld" } }));
//!
//! let store = I18nStore::new(catalog.clone());
//! let _plugin = I18nPlugin::install(store.clone());
//! let resolver = I18nMessageResolver::new(store);
//!
//! assert_eq!(resolver.resolve(&[Value::from("errors.required")]), "Required");
//! catalog.change_language("de");
//! assert_eq!(resolver.resolve(&[Value::from("errors.required")]), "Pflichtfeld");
//! ```

pub mod catalog;
pub mod plugin;
pub mod provider;
pub mod resolver;
pub mod store;

pub use catalog::Catalog;
pub use plugin::{I18nPlugin, TextBinding};
pub use provider::{I18n, I18nEvent, Options, TransKey};
pub use resolver::I18nMessageResolver;
pub use store::I18nStore;
