//! # rusty-forms-validate
//!
//! Field and form validation directives built on native constraint
//! validation, with custom rules, per-field messages and i18n-ready message
//! resolution.
//!
//! ## Quick Start
//!
//! ```rust
//! use rusty_forms_validate::dom::headless::HeadlessDocument;
//! use rusty_forms_validate::dom::{ControlKind, EventTarget, Event, InputType};
//! use rusty_forms_validate::{ValidatePlugin, Value};
//!
//! let plugin = ValidatePlugin::default();
//! let doc = HeadlessDocument::new();
//! let form = doc.create_form("signup");
//! let email = doc.create_control(ControlKind::Text(InputType::Email), "email", "email");
//! form.append(&email);
//! email.set_required(true);
//!
//! let _form = plugin.validate_form(form.clone(), &Value::Null).unwrap();
//! let _field = plugin
//!     .validate(email.clone(), &Value::parse(r#"{"m": {"valueMissing": "Email is required"}}"#).unwrap())
//!     .unwrap();
//!
//! let submitted = form.dispatch_event(&Event::new("submit"));
//! assert!(!submitted);
//! assert_eq!(plugin.message_store().get(&*email), "Email is required");
//! ```
//!
//! ## Architecture
//!
//! - **`dom`** - The control/form/event seam, plus a headless document
//! - **`config`** - Default layers and normalizers for `v`/`m` shorthand
//! - **`functions`** - Value, validity-message, custom-validator, message and
//!   rate-limit collaborators; each can be swapped through [`FunctionsOptions`]
//! - **`validators`** - The field and form validation passes
//! - **`plugin`** - Directives that wire it all onto DOM events
//! - **`settings`** - Default options from a TOML file

pub mod config;
pub mod dom;
pub mod error;
pub mod functions;
pub mod plugin;
pub mod reactive;
pub mod registry;
pub mod settings;
pub mod utils;
pub mod validators;
pub mod value;

pub use config::{FieldConfig, FormConfig};
pub use error::{Result, ValidateError};
pub use functions::{
    builtin_validators, create_custom_field_validator, Functions, FunctionsOptions,
    MessageResolver, MessageStore,
};
pub use plugin::{Directive, PluginOptions, ValidatePlugin};
pub use registry::Registry;
pub use settings::Settings;
pub use validators::{FieldOutcome, FieldValidator, FormValidator, ValidationEvents};
pub use value::{Function, Value};
