// File: rusty-forms-validate/src/utils/debounce.rs
// Purpose: Debounce - fire once the calls stop for `wait`

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::{Handler, LimitedHandler, Scheduler, TimeoutHandle};
use crate::dom::Event;

struct DebounceState {
    handler: Handler,
    wait: Duration,
    immediate: bool,
    scheduler: Rc<dyn Scheduler>,
    timeout: RefCell<Option<TimeoutHandle>>,
}

/// A debounced handler. See [`debounce`].
pub struct Debounced {
    state: Rc<DebounceState>,
}

/// Wrap `handler` so that it only fires after `wait` has passed without
/// another call.
///
/// Every call restarts the window. With `immediate`, the first call of a
/// quiet window fires synchronously instead and the end of the window fires
/// nothing.
pub fn debounce(
    scheduler: Rc<dyn Scheduler>,
    handler: Handler,
    wait: Duration,
    immediate: bool,
) -> Debounced {
    Debounced {
        state: Rc::new(DebounceState {
            handler,
            wait,
            immediate,
            scheduler,
            timeout: RefCell::new(None),
        }),
    }
}

impl LimitedHandler for Debounced {
    fn call(&self, event: Option<&Event>) {
        let state = &self.state;
        let call_now = state.immediate && state.timeout.borrow().is_none();

        if let Some(pending) = state.timeout.borrow_mut().take() {
            pending.clear();
        }

        let weak: Weak<DebounceState> = Rc::downgrade(state);
        let event_later = event.cloned();
        let handle = state.scheduler.set_timeout(
            state.wait,
            Box::new(move || {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                state.timeout.borrow_mut().take();
                if !state.immediate {
                    (state.handler)(event_later.as_ref());
                }
            }),
        );
        *state.timeout.borrow_mut() = Some(handle);

        if call_now {
            (state.handler)(event);
        }
    }

    fn cancel(&self) {
        if let Some(pending) = self.state.timeout.borrow_mut().take() {
            pending.clear();
        }
    }
}
