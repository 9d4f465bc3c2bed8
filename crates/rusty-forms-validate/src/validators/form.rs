// File: rusty-forms-validate/src/validators/form.rs
// Purpose: Validate every attached field of a form, then the form itself

use std::rc::Rc;
use tracing::trace;

use crate::dom::FormRef;
use crate::error::Result;
use crate::registry::Registry;

/// Runs the submission pass of a form
pub struct FormValidator {
    form: FormRef,
    report: bool,
    registry: Rc<Registry>,
}

impl FormValidator {
    pub fn new(form: FormRef, report: bool, registry: Rc<Registry>) -> Self {
        Self {
            form,
            report,
            registry,
        }
    }

    /// Submit-validate each field with validation attached, then report or
    /// check the whole form. Controls without validation still take part
    /// in the native check.
    pub fn validate(&self) -> Result<bool> {
        for element in self.form.elements() {
            if let Some(binding) = self.registry.field(element.node_id()) {
                binding.submit_validate(&self.registry)?;
            }
        }

        let valid = if self.report {
            self.form.report_validity()
        } else {
            self.form.check_validity()
        };
        trace!(form = %self.form.id(), valid, "form validated");
        Ok(valid)
    }
}
