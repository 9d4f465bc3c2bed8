// File: rusty-forms-validate/src/utils/throttle.rs
// Purpose: Throttle - fire at most once per `wait`, with leading/trailing edges

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use tokio::time::Instant;

use super::{Handler, LimitedHandler, Scheduler, TimeoutHandle};
use crate::dom::Event;

/// Edge options for [`throttle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleOptions {
    #[serde(default = "default_true")]
    pub leading: bool,
    #[serde(default = "default_true")]
    pub trailing: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self {
            leading: true,
            trailing: true,
        }
    }
}

struct ThrottleState {
    handler: Handler,
    wait: Duration,
    options: ThrottleOptions,
    scheduler: Rc<dyn Scheduler>,
    /// `None` until the first run (or after a trailing run when `leading` is off)
    last_ran: Cell<Option<Instant>>,
    trailing: RefCell<Option<TimeoutHandle>>,
}

impl ThrottleState {
    fn clear_trailing(&self) {
        if let Some(pending) = self.trailing.borrow_mut().take() {
            pending.clear();
        }
    }
}

/// A throttled handler. See [`throttle`].
pub struct Throttled {
    state: Rc<ThrottleState>,
}

/// Wrap `handler` so that it runs at most once per `wait`.
///
/// A call after the window has elapsed runs immediately (when `leading`, or
/// once a window has been opened). A call inside the window schedules one
/// trailing run for the window's end (when `trailing`), replacing any
/// trailing run already pending. With both edges off the first call only
/// opens the window.
pub fn throttle(
    scheduler: Rc<dyn Scheduler>,
    handler: Handler,
    wait: Duration,
    options: ThrottleOptions,
) -> Throttled {
    Throttled {
        state: Rc::new(ThrottleState {
            handler,
            wait,
            options,
            scheduler,
            last_ran: Cell::new(None),
            trailing: RefCell::new(None),
        }),
    }
}

impl LimitedHandler for Throttled {
    fn call(&self, event: Option<&Event>) {
        let state = &self.state;
        let now = state.scheduler.now();
        let ThrottleOptions { leading, trailing } = state.options;

        if state.last_ran.get().is_none() && !leading {
            state.last_ran.set(Some(now));
        }

        let elapsed = state
            .last_ran
            .get()
            .map(|last| now.saturating_duration_since(last));
        let remaining = match elapsed {
            Some(elapsed) => state.wait.saturating_sub(elapsed),
            None => Duration::ZERO,
        };

        if remaining.is_zero() {
            if leading || state.last_ran.get().is_some() {
                (state.handler)(event);
                state.last_ran.set(Some(now));
            }
            state.clear_trailing();
        } else if trailing {
            state.clear_trailing();
            let weak: Weak<ThrottleState> = Rc::downgrade(state);
            let event_later = event.cloned();
            let handle = state.scheduler.set_timeout(
                remaining,
                Box::new(move || {
                    let Some(state) = weak.upgrade() else {
                        return;
                    };
                    state.trailing.borrow_mut().take();
                    if !state.options.leading || state.last_ran.get().is_some() {
                        (state.handler)(event_later.as_ref());
                        let next = if state.options.leading {
                            Some(state.scheduler.now())
                        } else {
                            None
                        };
                        state.last_ran.set(next);
                    }
                }),
            );
            *state.trailing.borrow_mut() = Some(handle);
        }
    }

    fn cancel(&self) {
        self.state.clear_trailing();
    }
}
