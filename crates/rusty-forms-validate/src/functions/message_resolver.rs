// File: rusty-forms-validate/src/functions/message_resolver.rs
// Purpose: Turn message parameters into display strings

use std::rc::Rc;

use crate::value::Value;

/// Notified when previously resolved strings may be stale
pub type UpdateListener = Rc<dyn Fn()>;

/// Produces message strings and announces when the source changes
/// (a locale switch, a new translation resource).
pub trait MessageResolver {
    fn resolve(&self, params: &[Value]) -> String;

    /// Adding the same listener twice has no effect
    fn add_update_listener(&self, listener: UpdateListener);

    fn remove_update_listener(&self, listener: &UpdateListener);
}

/// Stringifies the first parameter and never announces updates
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMessageResolver;

impl MessageResolver for DefaultMessageResolver {
    fn resolve(&self, params: &[Value]) -> String {
        params.first().map(ToString::to_string).unwrap_or_default()
    }

    fn add_update_listener(&self, _listener: UpdateListener) {}

    fn remove_update_listener(&self, _listener: &UpdateListener) {}
}
