// File: rusty-forms-validate/src/plugin.rs
// Purpose: Form, field and message directives wired onto the DOM seam

use std::rc::Rc;
use tracing::{debug, error};

use crate::config::{
    field_default_config, form_default_config, EventPolicy, FieldConfig, FormConfig, Trigger,
};
use crate::dom::{ControlRef, Document, Event, FormRef, Listener};
use crate::error::{Result, ValidateError};
use crate::functions::{Functions, FunctionsOptions, MessageStore};
use crate::registry::{FieldBinding, FormEntry, Registry};
use crate::utils::{merge, Handler};
use crate::validators::{FieldValidator, FormValidator, ValidationEvents};
use crate::value::Value;

/// Plugin-wide defaults
///
/// # Panics
///
/// With the default [`FunctionsOptions`], fields using `inputLimit: debounce`
/// or `throttle` schedule their timers on [`crate::utils::TokioScheduler`].
/// Dispatching their `input` events outside a [`tokio::task::LocalSet`]
/// panics; pass a `scheduler` in `functions` to run elsewhere.
#[derive(Clone)]
pub struct PluginOptions {
    pub functions: FunctionsOptions,
    /// Layered over the built-in form defaults
    pub default_form_options: Value,
    /// Layered over the built-in field defaults
    pub default_field_options: Value,
    /// Directive prefix; events are named `{prefix}validate:success|failed`
    pub prefix: String,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            functions: FunctionsOptions::default(),
            default_form_options: Value::Null,
            default_field_options: Value::Null,
            prefix: "x-".to_string(),
        }
    }
}

/// An attached directive. Cleanup runs once, on [`Directive::cleanup`] or on drop.
#[must_use = "dropping a Directive detaches it immediately"]
#[derive(Default)]
pub struct Directive {
    cleanups: Vec<Box<dyn FnOnce()>>,
}

impl Directive {
    fn on_cleanup(&mut self, cleanup: impl FnOnce() + 'static) {
        self.cleanups.push(Box::new(cleanup));
    }

    /// Detach now
    pub fn cleanup(self) {}
}

impl Drop for Directive {
    fn drop(&mut self) {
        for cleanup in self.cleanups.drain(..) {
            cleanup();
        }
    }
}

/// The validation plugin: one set of [`Functions`] and one registry shared
/// by every directive it attaches.
pub struct ValidatePlugin {
    functions: Functions,
    registry: Rc<Registry>,
    events: Rc<ValidationEvents>,
    default_form_options: Value,
    default_field_options: Value,
}

impl ValidatePlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            functions: Functions::new(options.functions),
            registry: Rc::new(Registry::new()),
            events: Rc::new(ValidationEvents::new(&options.prefix)),
            default_form_options: options.default_form_options,
            default_field_options: options.default_field_options,
        }
    }

    pub fn functions(&self) -> &Functions {
        &self.functions
    }

    pub fn message_store(&self) -> &Rc<MessageStore> {
        &self.functions.message_store
    }

    pub fn registry(&self) -> &Rc<Registry> {
        &self.registry
    }

    pub fn events(&self) -> &ValidationEvents {
        &self.events
    }

    /// Attach form validation.
    ///
    /// The trigger event runs `before`, validates every attached field and
    /// the form, runs `after`, prevents the default action when invalid (if
    /// configured) and dispatches the success or failed event on the form.
    pub fn validate_form(&self, form: FormRef, expression: &Value) -> Result<Directive> {
        let merged = merge(
            &form_default_config(form.clone().as_event_target()),
            [&self.default_form_options, expression],
        );
        let config = FormConfig::from_value(&merged)?;
        let report = config.report;
        let Trigger {
            target,
            event: event_name,
            prevent_default,
            before,
            after,
        } = config.trigger;

        let validator = Rc::new(FormValidator::new(form.clone(), report, self.registry.clone()));
        let weak_validator = Rc::downgrade(&validator);
        let weak_form = Rc::downgrade(&form);
        let events = self.events.clone();

        let listener: Listener = Rc::new(move |event: &Event| {
            let (Some(validator), Some(form)) = (weak_validator.upgrade(), weak_form.upgrade()) else {
                return;
            };
            if let Some(before) = &before {
                before(Some(event));
            }
            let valid = validator.validate().unwrap_or_else(|e| {
                error!(form = %form.id(), error = %e, "form validation aborted");
                false
            });
            if let Some(after) = &after {
                after(Some(event));
            }
            if !valid && prevent_default {
                event.prevent_default();
            }
            let name = if valid { &events.success } else { &events.failed };
            form.dispatch_event(&Event::new(name.as_str()));
        });
        target.add_event_listener(&event_name, listener.clone());

        let node = form.node_id();
        self.registry.insert_form(node, FormEntry { report });
        debug!(form = %form.id(), event = %event_name, report, "form validation attached");

        let registry = self.registry.clone();
        let mut directive = Directive::default();
        directive.on_cleanup(move || {
            target.remove_event_listener(&event_name, &listener);
            registry.remove_form(node);
            drop(validator);
            debug!(form = %form.id(), "form validation detached");
        });
        Ok(directive)
    }

    /// Attach field validation.
    ///
    /// Fails when the control lacks an `id` or `name`, when a rule has no
    /// message, or when `inputLimit` names an unknown method.
    pub fn validate(&self, control: ControlRef, expression: &Value) -> Result<Directive> {
        if control.id().is_empty() || control.name().is_empty() {
            return Err(ValidateError::MissingIdentity);
        }

        let form_layer = control
            .form()
            .and_then(|form| self.registry.form(form.node_id()))
            .map(|entry| Value::object([("report", entry.report)]))
            .unwrap_or_default();
        let merged = merge(
            &field_default_config(),
            [&self.default_field_options, &form_layer, expression],
        );
        let config = Rc::new(FieldConfig::from_value(&merged)?);

        let validator = Rc::new(FieldValidator::new(
            control.clone(),
            config.clone(),
            self.functions.clone(),
            self.events.clone(),
        ));

        let mut events: Vec<(String, Listener)> = Vec::new();
        let mut limiters = Vec::new();

        if config.on_change.is_enabled() || (!config.on_blur.is_enabled() && !config.on_input.is_enabled()) {
            let handler = field_handler(&validator, &config.on_change);
            events.push(("change".to_string(), Rc::new(move |e: &Event| handler(Some(e)))));
        }
        if config.on_blur.is_enabled() {
            let handler = field_handler(&validator, &config.on_blur);
            events.push(("blur".to_string(), Rc::new(move |e: &Event| handler(Some(e)))));
        }
        if config.on_input.is_enabled() {
            let limited = self
                .functions
                .input_rate_limiter
                .limit(field_handler(&validator, &config.on_input), &config)?;
            limiters.push(limited.clone());
            events.push(("input".to_string(), Rc::new(move |e: &Event| limited.call(Some(e)))));
        }

        let store = self.functions.message_store.clone();
        let weak_control = Rc::downgrade(&control);
        let form_submit = validator.form_submit_flag();
        let report = config.report;
        store.create(&*control, move |message: &str| {
            let Some(control) = weak_control.upgrade() else {
                return;
            };
            control.set_custom_validity(message);
            if form_submit.get() && !message.is_empty() && report {
                control.report_validity();
            }
        });

        let binding = Rc::new(FieldBinding::new(
            validator,
            events,
            limiters,
            self.events.directive.clone(),
        ));
        binding.attach();
        let node = control.node_id();
        self.registry.insert_field(node, binding.clone());
        debug!(
            field = %control.id(),
            events = ?binding.event_names().collect::<Vec<_>>(),
            "field directive bound"
        );

        let registry = self.registry.clone();
        let mut directive = Directive::default();
        directive.on_cleanup(move || {
            binding.detach();
            store.delete(&*control);
            registry.remove_field(node);
        });
        Ok(directive)
    }

    /// Render the message of the field matched by `selector` into `sink`,
    /// now and after every message store change. An unmatched selector
    /// renders `""`.
    pub fn validate_message_for(
        &self,
        document: Rc<dyn Document>,
        selector: impl Into<String>,
        sink: impl Fn(&str) + 'static,
    ) -> Directive {
        let selector = selector.into();
        let store = self.functions.message_store.clone();
        let weak_store = Rc::downgrade(&store);

        let render: Rc<dyn Fn()> = Rc::new(move || {
            let Some(store) = weak_store.upgrade() else {
                return;
            };
            let text = document
                .query_selector(&selector)
                .map(|field| store.get(&*field))
                .unwrap_or_default();
            sink(&text);
        });
        render();
        store.subscribe(render.clone());

        let mut directive = Directive::default();
        directive.on_cleanup(move || store.unsubscribe(&render));
        directive
    }
}

impl Default for ValidatePlugin {
    fn default() -> Self {
        Self::new(PluginOptions::default())
    }
}

/// `before` hook, validation, `after` hook. Holds the validator weakly.
fn field_handler(validator: &Rc<FieldValidator>, policy: &EventPolicy) -> Handler {
    let weak = Rc::downgrade(validator);
    let (before, after) = (policy.before(), policy.after());
    Rc::new(move |event: Option<&Event>| {
        let Some(validator) = weak.upgrade() else {
            return;
        };
        if let Some(before) = &before {
            before(event);
        }
        if let Err(e) = validator.validate() {
            error!(field = %validator.control().id(), error = %e, "field validation aborted");
        }
        if let Some(after) = &after {
            after(event);
        }
    })
}
