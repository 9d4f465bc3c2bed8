// File: rusty-forms-i18n/src/plugin.rs
// Purpose: Translation accessors and the i18n-text binding

use rusty_forms_validate::reactive::Watcher;
use std::rc::{Rc, Weak};
use tracing::debug;

use crate::provider::{I18n, I18nEvent, Options, TransKey};
use crate::store::I18nStore;

/// Translation helpers bound to one [`I18nStore`].
///
/// The store follows provider events while the plugin is alive; dropping it
/// unregisters its callbacks from the provider.
pub struct I18nPlugin {
    store: Rc<I18nStore>,
    hooks: Vec<(I18nEvent, Rc<dyn Fn()>)>,
}

impl I18nPlugin {
    /// Bump the store's timestamp on every provider change event
    pub fn install(store: Rc<I18nStore>) -> Self {
        let hooks = I18nEvent::ALL
            .into_iter()
            .map(|event| {
                let weak: Weak<I18nStore> = Rc::downgrade(&store);
                let hook: Rc<dyn Fn()> = Rc::new(move || {
                    if let Some(store) = weak.upgrade() {
                        store.touch();
                    }
                });
                store.i18n().on(event, hook.clone());
                (event, hook)
            })
            .collect();
        debug!(language = %store.i18n().language(), "i18n plugin installed");
        Self { store, hooks }
    }

    /// Stop following provider events
    pub fn uninstall(self) {}

    pub fn store(&self) -> &Rc<I18nStore> {
        &self.store
    }

    pub fn t(&self, key: impl Into<TransKey>, options: Option<&Options>) -> String {
        self.store.i18n().t(&key.into(), options)
    }

    pub fn i18n(&self) -> Rc<dyn I18n> {
        self.store.i18n().clone()
    }

    /// Render `t(key, options)` into `sink` now and after every translation
    /// change, until the returned binding is dropped.
    pub fn i18n_text(
        &self,
        key: impl Into<TransKey>,
        options: Option<Options>,
        sink: impl Fn(&str) + 'static,
    ) -> TextBinding {
        let key = key.into();
        let i18n = self.store.i18n().clone();
        let render = move || sink(&i18n.t(&key, options.as_ref()));
        render();
        let watcher = self.store.timestamp().watch(move |_, _| render());
        TextBinding {
            store: Rc::downgrade(&self.store),
            watcher: Some(watcher),
        }
    }
}

impl Drop for I18nPlugin {
    fn drop(&mut self) {
        for (event, hook) in self.hooks.drain(..) {
            self.store.i18n().off(event, &hook);
        }
        debug!("i18n plugin uninstalled");
    }
}

/// A live `i18n-text` binding. Dropping it stops the updates.
#[must_use = "dropping a TextBinding stops its updates"]
pub struct TextBinding {
    store: Weak<I18nStore>,
    watcher: Option<Watcher<i64>>,
}

impl TextBinding {
    pub fn cleanup(self) {}
}

impl Drop for TextBinding {
    fn drop(&mut self) {
        if let (Some(store), Some(watcher)) = (self.store.upgrade(), self.watcher.take()) {
            store.timestamp().unwatch(&watcher);
        }
    }
}
