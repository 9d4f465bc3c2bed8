// File: rusty-forms-validate/src/functions/rate_limiter.rs
// Purpose: Wrap `input` handlers according to the `inputLimit` option

use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

use crate::config::FieldConfig;
use crate::error::{Result, ValidateError};
use crate::utils::{debounce, throttle, Handler, LimitedHandler, Scheduler, Unlimited};

/// Chooses the rate limiter for a field's `input` handler
pub trait InputRateLimiter {
    fn limit(&self, handler: Handler, config: &FieldConfig) -> Result<Rc<dyn LimitedHandler>>;
}

/// Understands `none`, `debounce[:<ms>]` and `throttle[:<ms>]`
///
/// # Panics
///
/// Calls to a debounced or throttled handler panic when `scheduler` panics,
/// which [`crate::utils::TokioScheduler`] does outside a
/// [`tokio::task::LocalSet`].
pub struct DefaultInputRateLimiter {
    scheduler: Rc<dyn Scheduler>,
}

impl DefaultInputRateLimiter {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self { scheduler }
    }
}

impl InputRateLimiter for DefaultInputRateLimiter {
    fn limit(&self, handler: Handler, config: &FieldConfig) -> Result<Rc<dyn LimitedHandler>> {
        let limit = config.input_limit.trim();
        if limit.is_empty() {
            return Ok(Rc::new(Unlimited::new(handler)));
        }
        let (method, wait) = match limit.split_once(':') {
            Some((method, wait)) => (method.trim(), Some(wait.trim())),
            None => (limit, None),
        };
        let opts = &config.input_limit_opts;

        let limited: Rc<dyn LimitedHandler> = match method {
            "none" => Rc::new(Unlimited::new(handler)),
            "debounce" => {
                let wait = parse_wait(method, wait)?.unwrap_or_else(|| opts.debounce.wait());
                debug!(wait_ms = wait.as_millis() as u64, "debouncing input validation");
                Rc::new(debounce(
                    self.scheduler.clone(),
                    handler,
                    wait,
                    opts.debounce.immediate,
                ))
            }
            "throttle" => {
                let wait = parse_wait(method, wait)?.unwrap_or_else(|| opts.throttle.wait());
                debug!(wait_ms = wait.as_millis() as u64, "throttling input validation");
                Rc::new(throttle(
                    self.scheduler.clone(),
                    handler,
                    wait,
                    opts.throttle.options,
                ))
            }
            other => {
                return Err(ValidateError::UnknownRateLimiter {
                    method: other.to_string(),
                })
            }
        };
        Ok(limited)
    }
}

/// Milliseconds after the `:`; an empty wait falls back to the configured one
fn parse_wait(method: &str, wait: Option<&str>) -> Result<Option<Duration>> {
    let Some(wait) = wait.filter(|w| !w.is_empty()) else {
        return Ok(None);
    };
    wait.parse::<f64>()
        .ok()
        .filter(|ms| *ms >= 0.0)
        .and_then(|ms| Duration::try_from_secs_f64(ms / 1000.0).ok())
        .map(Some)
        .ok_or_else(|| ValidateError::InvalidRateLimitWait {
            method: method.to_string(),
            wait: wait.to_string(),
        })
}
