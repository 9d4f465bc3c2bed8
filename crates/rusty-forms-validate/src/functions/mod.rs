// File: rusty-forms-validate/src/functions/mod.rs
// Purpose: Pluggable collaborators used by field validation

pub mod builtin;
pub mod custom_validator;
pub mod field_value;
pub mod html5_message;
pub mod message_resolver;
pub mod message_store;
pub mod rate_limiter;

use std::rc::Rc;

use crate::utils::{Scheduler, TokioScheduler};

pub use builtin::builtin_validators;
pub use custom_validator::{create_custom_field_validator, CustomFieldValidator, CustomValidatorTable};
pub use field_value::{DefaultFieldValueResolver, FieldValue, FieldValueResolver};
pub use html5_message::{DefaultHtml5MessageResolver, Html5MessageResolver};
pub use message_resolver::{DefaultMessageResolver, MessageResolver, UpdateListener};
pub use message_store::{MessageHandler, MessageStore};
pub use rate_limiter::{DefaultInputRateLimiter, InputRateLimiter};

/// The collaborators shared by every field of one plugin instance
#[derive(Clone)]
pub struct Functions {
    pub field_value_resolver: Rc<dyn FieldValueResolver>,
    pub message_resolver: Rc<dyn MessageResolver>,
    /// Consulted in order for rules without a validator function
    pub custom_field_validators: Vec<Rc<dyn CustomFieldValidator>>,
    pub input_rate_limiter: Rc<dyn InputRateLimiter>,
    pub html5_message_resolver: Rc<dyn Html5MessageResolver>,
    pub message_store: Rc<MessageStore>,
}

/// Overrides for [`Functions`]; anything left `None` gets the default
#[derive(Clone, Default)]
pub struct FunctionsOptions {
    pub field_value_resolver: Option<Rc<dyn FieldValueResolver>>,
    pub message_resolver: Option<Rc<dyn MessageResolver>>,
    pub custom_field_validators: Option<Vec<Rc<dyn CustomFieldValidator>>>,
    pub input_rate_limiter: Option<Rc<dyn InputRateLimiter>>,
    pub html5_message_resolver: Option<Rc<dyn Html5MessageResolver>>,
    pub message_store: Option<Rc<MessageStore>>,
    /// Timer source for the default input rate limiter
    pub scheduler: Option<Rc<dyn Scheduler>>,
}

impl FunctionsOptions {
    pub fn with_message_resolver(mut self, resolver: Rc<dyn MessageResolver>) -> Self {
        self.message_resolver = Some(resolver);
        self
    }

    pub fn with_custom_validator(mut self, validator: Rc<dyn CustomFieldValidator>) -> Self {
        self.custom_field_validators
            .get_or_insert_with(Vec::new)
            .push(validator);
        self
    }

    pub fn with_scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }
}

impl Functions {
    /// Fill in defaults. Unless one is given, the message store is built on
    /// the chosen message resolver.
    pub fn new(options: FunctionsOptions) -> Self {
        let message_resolver = options
            .message_resolver
            .unwrap_or_else(|| Rc::new(DefaultMessageResolver));
        let scheduler = options
            .scheduler
            .unwrap_or_else(|| Rc::new(TokioScheduler));
        let message_store = options
            .message_store
            .unwrap_or_else(|| MessageStore::new(message_resolver.clone()));

        Self {
            field_value_resolver: options
                .field_value_resolver
                .unwrap_or_else(|| Rc::new(DefaultFieldValueResolver)),
            message_resolver,
            custom_field_validators: options.custom_field_validators.unwrap_or_default(),
            input_rate_limiter: options
                .input_rate_limiter
                .unwrap_or_else(|| Rc::new(DefaultInputRateLimiter::new(scheduler))),
            html5_message_resolver: options
                .html5_message_resolver
                .unwrap_or_else(|| Rc::new(DefaultHtml5MessageResolver)),
            message_store,
        }
    }
}

impl Default for Functions {
    fn default() -> Self {
        Self::new(FunctionsOptions::default())
    }
}
