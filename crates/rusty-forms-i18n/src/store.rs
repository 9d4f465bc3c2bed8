// File: rusty-forms-i18n/src/store.rs
// Purpose: Provider handle plus the timestamp that marks translation changes

use chrono::Utc;
use rusty_forms_validate::reactive::Signal;
use std::rc::Rc;

use crate::provider::I18n;

/// Shared by the i18n plugin and the message resolver.
///
/// `timestamp` is bumped whenever the provider reports a change; anything
/// rendering translated text watches it.
pub struct I18nStore {
    i18n: Rc<dyn I18n>,
    timestamp: Signal<i64>,
}

impl I18nStore {
    pub fn new(i18n: Rc<dyn I18n>) -> Rc<Self> {
        Rc::new(Self {
            i18n,
            timestamp: Signal::new(Utc::now().timestamp_millis()),
        })
    }

    pub fn i18n(&self) -> &Rc<dyn I18n> {
        &self.i18n
    }

    pub fn timestamp(&self) -> &Signal<i64> {
        &self.timestamp
    }

    /// Set the timestamp to now in epoch milliseconds. Always moves forward,
    /// so watchers fire even for two changes within one millisecond.
    pub fn touch(&self) {
        let now = Utc::now().timestamp_millis();
        self.timestamp.update(|prev| now.max(prev + 1));
    }
}
