// File: rusty-forms-validate/src/utils/mod.rs
// Purpose: Rate limiters, timer scheduling and deep merge

pub mod debounce;
pub mod merge;
pub mod scheduler;
pub mod throttle;

use std::rc::Rc;

use crate::dom::Event;

pub use debounce::{debounce, Debounced};
pub use merge::merge;
pub use scheduler::{Scheduler, TimeoutHandle, TokioScheduler};
pub use throttle::{throttle, ThrottleOptions, Throttled};

/// A plain event handler
pub type Handler = Rc<dyn Fn(Option<&Event>)>;

/// A handler wrapped by a rate limiter
pub trait LimitedHandler {
    fn call(&self, event: Option<&Event>);

    /// Drop any pending invocation. Calling it again is a no-op.
    fn cancel(&self);
}

/// Pass-through used when no rate limiting is configured
pub struct Unlimited(Handler);

impl Unlimited {
    pub fn new(handler: Handler) -> Self {
        Self(handler)
    }
}

impl LimitedHandler for Unlimited {
    fn call(&self, event: Option<&Event>) {
        (self.0)(event)
    }

    fn cancel(&self) {}
}
