/// Input rate limiting through the field directive
///
/// Timers run on a paused tokio clock inside a LocalSet, or on a host scheduler.

use rusty_forms_validate::dom::headless::{HeadlessControl, HeadlessDocument};
use rusty_forms_validate::dom::{ControlKind, Event, EventTarget, InputType, Listener};
use rusty_forms_validate::utils::{Scheduler, TimeoutHandle};
use rusty_forms_validate::{FunctionsOptions, PluginOptions, ValidatePlugin, Value};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;
use tokio::time::{sleep, Instant};

/// Host-driven timers: tasks run only when `flush` is called
#[derive(Default)]
struct ManualScheduler {
    pending: RefCell<Vec<(Rc<Cell<bool>>, Box<dyn FnOnce()>)>>,
}

impl ManualScheduler {
    fn flush(&self) {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        for (cleared, task) in due {
            if !cleared.get() {
                task();
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn set_timeout(&self, _delay: Duration, task: Box<dyn FnOnce()>) -> TimeoutHandle {
        let cleared = Rc::new(Cell::new(false));
        self.pending.borrow_mut().push((cleared.clone(), task));
        TimeoutHandle::new(move || cleared.set(true))
    }
}

fn required_input(doc: &HeadlessDocument) -> (Rc<HeadlessControl>, Rc<Cell<u32>>) {
    let input = doc.create_control(ControlKind::Text(InputType::Text), "query", "query");
    input.set_required(true);
    let runs = Rc::new(Cell::new(0));
    let count = runs.clone();
    let listener: Listener = Rc::new(move |_: &Event| count.set(count.get() + 1));
    input.add_event_listener("x-validate:failed", listener.clone());
    input.add_event_listener("x-validate:success", listener);
    (input, runs)
}

fn type_keys(input: &HeadlessControl, times: usize) {
    for _ in 0..times {
        input.dispatch_event(&Event::new("input"));
    }
}

#[tokio::test(start_paused = true)]
async fn test_debounced_input_validates_once() {
    LocalSet::new()
        .run_until(async {
            let plugin = ValidatePlugin::default();
            let doc = HeadlessDocument::new();
            let (input, runs) = required_input(&doc);
            let _field = plugin
                .validate(
                    input.clone(),
                    &Value::from(json!({ "onInput": true, "inputLimit": "debounce:100" })),
                )
                .unwrap();

            type_keys(&input, 3);
            assert_eq!(runs.get(), 0);

            sleep(Duration::from_millis(101)).await;
            assert_eq!(runs.get(), 1);
            assert_eq!(plugin.message_store().get(&*input), "Please fill out this field.");
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_debounce_uses_configured_wait() {
    LocalSet::new()
        .run_until(async {
            let plugin = ValidatePlugin::default();
            let doc = HeadlessDocument::new();
            let (input, runs) = required_input(&doc);
            let _field = plugin
                .validate(
                    input.clone(),
                    &Value::from(json!({
                        "onInput": true,
                        "inputLimit": "debounce",
                        "inputLimitOpts": { "debounce": { "wait": 40 } },
                    })),
                )
                .unwrap();

            type_keys(&input, 1);
            sleep(Duration::from_millis(39)).await;
            assert_eq!(runs.get(), 0);
            sleep(Duration::from_millis(2)).await;
            assert_eq!(runs.get(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_throttled_input_trails_once_per_window() {
    LocalSet::new()
        .run_until(async {
            let plugin = ValidatePlugin::default();
            let doc = HeadlessDocument::new();
            let (input, runs) = required_input(&doc);
            let _field = plugin
                .validate(
                    input.clone(),
                    &Value::from(json!({ "onInput": true, "inputLimit": "throttle:100" })),
                )
                .unwrap();

            type_keys(&input, 1);
            sleep(Duration::from_millis(50)).await;
            type_keys(&input, 2);
            assert_eq!(runs.get(), 0);

            sleep(Duration::from_millis(51)).await;
            assert_eq!(runs.get(), 1);

            sleep(Duration::from_millis(300)).await;
            assert_eq!(runs.get(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_cleanup_cancels_pending_validation() {
    LocalSet::new()
        .run_until(async {
            let plugin = ValidatePlugin::default();
            let doc = HeadlessDocument::new();
            let (input, runs) = required_input(&doc);
            let field = plugin
                .validate(
                    input.clone(),
                    &Value::from(json!({ "onInput": true, "inputLimit": "debounce:100" })),
                )
                .unwrap();

            type_keys(&input, 1);
            field.cleanup();
            assert_eq!(input.listener_count("input"), 0);

            sleep(Duration::from_millis(200)).await;
            assert_eq!(runs.get(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_invalid_wait_is_rejected() {
    LocalSet::new()
        .run_until(async {
            let plugin = ValidatePlugin::default();
            let doc = HeadlessDocument::new();
            let (input, _) = required_input(&doc);
            let result = plugin.validate(
                input,
                &Value::from(json!({ "onInput": true, "inputLimit": "debounce:soon" })),
            );
            assert!(result.is_err());
        })
        .await;
}

#[test]
fn test_host_scheduler_runs_without_local_set() {
    let scheduler = Rc::new(ManualScheduler::default());
    let plugin = ValidatePlugin::new(PluginOptions {
        functions: FunctionsOptions::default().with_scheduler(scheduler.clone()),
        ..PluginOptions::default()
    });
    let doc = HeadlessDocument::new();
    let (input, runs) = required_input(&doc);
    let _field = plugin
        .validate(
            input.clone(),
            &Value::from(json!({ "onInput": true, "inputLimit": "debounce" })),
        )
        .unwrap();

    type_keys(&input, 3);
    assert_eq!(runs.get(), 0);

    scheduler.flush();
    assert_eq!(runs.get(), 1);
}
