// File: rusty-forms-validate/src/validators/field.rs
// Purpose: One field's validation pass

use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, trace};

use super::{FieldOutcome, ValidationEvents};
use crate::config::{FieldConfig, RuleCheck};
use crate::dom::{Control, ControlRef, Event};
use crate::error::Result;
use crate::functions::Functions;

/// Validates one control against its [`FieldConfig`].
///
/// Each pass re-evaluates everything from the current DOM state:
///
/// 1. clear the field's message
/// 2. run native constraint validation (reporting when in a submission pass
///    with `report` set) and stop on failure with the matching message
/// 3. stop with success when the field is optional and empty
/// 4. run the rules in order and stop at the first failure
///
/// Every pass ends by dispatching the success or failed event on the control.
pub struct FieldValidator {
    control: ControlRef,
    config: Rc<FieldConfig>,
    functions: Functions,
    events: Rc<ValidationEvents>,
    form_submit: Rc<Cell<bool>>,
}

impl FieldValidator {
    /// A field without a form starts in submission mode, since no submit
    /// will ever switch it on.
    pub fn new(
        control: ControlRef,
        config: Rc<FieldConfig>,
        functions: Functions,
        events: Rc<ValidationEvents>,
    ) -> Self {
        let form_submit = Rc::new(Cell::new(control.form().is_none()));
        Self {
            control,
            config,
            functions,
            events,
            form_submit,
        }
    }

    pub fn control(&self) -> &ControlRef {
        &self.control
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Whether the field has taken part in a form submission pass
    pub fn form_submit(&self) -> bool {
        self.form_submit.get()
    }

    pub fn set_form_submit(&self, value: bool) {
        self.form_submit.set(value);
    }

    /// Shared flag for handlers that must see later submissions
    pub(crate) fn form_submit_flag(&self) -> Rc<Cell<bool>> {
        self.form_submit.clone()
    }

    pub fn validate(&self) -> Result<FieldOutcome> {
        let control: &dyn Control = self.control.as_ref();
        let store = &self.functions.message_store;

        store.clear(control);

        let report = self.form_submit.get() && self.config.report;
        let valid = if report {
            control.report_validity()
        } else {
            control.check_validity()
        };

        if !valid {
            let params = self
                .functions
                .html5_message_resolver
                .resolve(control, &self.config.messages)
                .unwrap_or_default();
            store.set(control, params);
            if report {
                control.report_validity();
            }
            trace!(field = %control.id(), "constraint validation failed");
            return Ok(self.finish(FieldOutcome::Failed));
        }

        let resolver = &self.functions.field_value_resolver;
        let value = resolver.resolve(control)?;

        if !control.required() && resolver.is_empty(&value) {
            store.clear(control);
            return Ok(self.finish(FieldOutcome::Success));
        }

        for (key, rule) in self.config.rules.iter() {
            let passed = match &rule.check {
                RuleCheck::Validator(validator) => validator(control, &value),
                RuleCheck::Args(args) => {
                    let mut supported = self
                        .functions
                        .custom_field_validators
                        .iter()
                        .filter(|v| v.is_supported(key))
                        .peekable();
                    if supported.peek().is_none() {
                        debug!(rule = %key, "no custom validator supports rule, treating it as passed");
                    }
                    supported.all(|v| v.validate(control, &value, key, args))
                }
            };

            if !passed {
                store.set(control, rule.message.clone());
                if report {
                    control.report_validity();
                }
                trace!(field = %control.id(), rule = %key, "rule failed");
                return Ok(self.finish(FieldOutcome::Failed));
            }
        }

        Ok(self.finish(FieldOutcome::Success))
    }

    fn finish(&self, outcome: FieldOutcome) -> FieldOutcome {
        let name = match outcome {
            FieldOutcome::Success => &self.events.success,
            FieldOutcome::Failed => &self.events.failed,
        };
        trace!(field = %self.control.id(), outcome = ?outcome, "field validated");
        self.control.dispatch_event(&Event::new(name.as_str()));
        outcome
    }
}
