// File: rusty-forms-validate/src/reactive.rs
// Purpose: Observer lists and a watchable cell for single-threaded fan-out

use std::cell::RefCell;
use std::rc::Rc;

/// Ordered observer list keyed by `Rc` identity
pub struct Listeners<F: ?Sized> {
    entries: RefCell<Vec<Rc<F>>>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<F: ?Sized> Listeners<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adding a listener that is already present is a no-op
    pub fn add(&self, listener: Rc<F>) {
        let mut entries = self.entries.borrow_mut();
        if !entries.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            entries.push(listener);
        }
    }

    pub fn remove(&self, listener: &Rc<F>) {
        self.entries.borrow_mut().retain(|l| !Rc::ptr_eq(l, listener));
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Copy of the current list, so callers can notify without holding a borrow
    pub fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries.borrow().clone()
    }
}

impl Listeners<dyn Fn()> {
    pub fn notify(&self) {
        for listener in self.snapshot() {
            listener();
        }
    }
}

/// Watcher callback: `(new, old)`
pub type Watcher<T> = Rc<dyn Fn(&T, &T)>;

/// A value whose changes can be watched
pub struct Signal<T> {
    value: RefCell<T>,
    watchers: Listeners<dyn Fn(&T, &T)>,
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            watchers: Listeners::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store a new value; watchers run only when it differs from the old one
    pub fn set(&self, value: T) {
        let old = self.value.replace(value.clone());
        if old != value {
            for watcher in self.watchers.snapshot() {
                watcher(&value, &old);
            }
        }
    }

    /// Update in place from the current value
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value.borrow());
        self.set(next);
    }

    pub fn watch(&self, watcher: impl Fn(&T, &T) + 'static) -> Watcher<T> {
        let watcher: Watcher<T> = Rc::new(watcher);
        self.watchers.add(watcher.clone());
        watcher
    }

    pub fn unwatch(&self, watcher: &Watcher<T>) {
        self.watchers.remove(watcher);
    }
}
