// File: rusty-forms-validate/src/utils/scheduler.rs
// Purpose: Timer seam used by debounce and throttle

use std::time::Duration;
use tokio::time::Instant;

/// Macrotask timers, the way a browser's `setTimeout` behaves
pub trait Scheduler {
    /// Current time on the scheduler's clock
    fn now(&self) -> Instant;

    /// Run `task` once after `delay`
    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimeoutHandle;
}

/// Pending timeout. `clear` cancels it; dropping the handle does not.
pub struct TimeoutHandle {
    cancel: Box<dyn FnOnce()>,
}

impl TimeoutHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    pub fn clear(self) {
        (self.cancel)()
    }
}

/// Timers on the current-thread tokio runtime.
///
/// Tasks are spawned with [`tokio::task::spawn_local`], so timeouts must be
/// scheduled from inside a [`tokio::task::LocalSet`]. The clock is
/// [`tokio::time::Instant`], which honours `tokio::time::pause`.
///
/// # Panics
///
/// `set_timeout` panics when called outside a `LocalSet` on a tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimeoutHandle {
        // Create the sleep eagerly so the deadline counts from this call
        let sleep = tokio::time::sleep(delay);
        let handle = tokio::task::spawn_local(async move {
            sleep.await;
            task();
        });
        TimeoutHandle::new(move || handle.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires_after_delay() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(Cell::new(false));
                let flag = fired.clone();
                let _handle = TokioScheduler.set_timeout(
                    Duration::from_millis(100),
                    Box::new(move || flag.set(true)),
                );

                tokio::time::sleep(Duration::from_millis(99)).await;
                assert!(!fired.get());
                tokio::time::sleep(Duration::from_millis(2)).await;
                assert!(fired.get());
            })
            .await;
    }

    #[test]
    #[should_panic]
    fn test_set_timeout_requires_local_set() {
        let _handle = TokioScheduler.set_timeout(Duration::from_millis(10), Box::new(|| {}));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleared_timeout_never_fires() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(Cell::new(false));
                let flag = fired.clone();
                let handle = TokioScheduler.set_timeout(
                    Duration::from_millis(10),
                    Box::new(move || flag.set(true)),
                );
                handle.clear();

                tokio::time::sleep(Duration::from_millis(50)).await;
                assert!(!fired.get());
            })
            .await;
    }
}
