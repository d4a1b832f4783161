use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::dispatch::{AsyncDispatcher, TaskOutcome};
use crate::errors::AutomationError;
use crate::tests::mock::{library_over, MockControl, MockProvider, MockWindow};
use crate::tests::init_tracing;

const WAIT: Duration = Duration::from_secs(5);

fn dispatcher() -> AsyncDispatcher {
    AsyncDispatcher::new(2).unwrap()
}

#[test]
fn submit_returns_before_the_work_completes() {
    init_tracing();
    let dispatcher = dispatcher();
    let start = Instant::now();
    let task_id = dispatcher
        .submit(|| {
            thread::sleep(Duration::from_millis(300));
            Ok(TaskOutcome::Message("done".to_string()))
        })
        .unwrap();
    assert!(start.elapsed() < Duration::from_millis(150), "submit blocked");

    match dispatcher.wait(task_id, WAIT).unwrap() {
        TaskOutcome::Message(message) => assert_eq!(message, "done"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn a_timed_out_task_stays_retrievable() {
    let dispatcher = dispatcher();
    let task_id = dispatcher
        .submit(|| {
            thread::sleep(Duration::from_millis(250));
            Ok(TaskOutcome::Message("slow".to_string()))
        })
        .unwrap();

    let err = dispatcher.wait(task_id, Duration::from_millis(50)).unwrap_err();
    assert!(matches!(err, AutomationError::Timeout(_)), "{err}");
    assert_eq!(dispatcher.pending().unwrap(), 1);

    match dispatcher.wait(task_id, WAIT).unwrap() {
        TaskOutcome::Message(message) => assert_eq!(message, "slow"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(dispatcher.pending().unwrap(), 0);
}

#[test]
fn task_errors_reach_the_waiter_with_the_original_message() {
    let dispatcher = dispatcher();
    let task_id = dispatcher
        .submit(|| {
            Err(AutomationError::ControlNotFound(
                "control 'name:Ghost' not found".to_string(),
            ))
        })
        .unwrap();

    let err = dispatcher.wait(task_id, WAIT).unwrap_err();
    match err {
        AutomationError::AsyncOperation(msg) => {
            assert!(msg.contains("name:Ghost"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn waiting_on_an_unknown_id_is_an_argument_error() {
    let dispatcher = dispatcher();
    let err = dispatcher.wait(Uuid::new_v4(), WAIT).unwrap_err();
    assert!(matches!(err, AutomationError::InvalidArgument(_)), "{err}");
}

#[test]
fn a_retrieved_result_cannot_be_retrieved_twice() {
    let dispatcher = dispatcher();
    let task_id = dispatcher
        .submit(|| Ok(TaskOutcome::Message("once".to_string())))
        .unwrap();
    dispatcher.wait(task_id, WAIT).unwrap();

    let err = dispatcher.wait(task_id, WAIT).unwrap_err();
    assert!(matches!(err, AutomationError::InvalidArgument(_)), "{err}");
}

#[test]
fn task_ids_are_unique() {
    let dispatcher = dispatcher();
    let mut seen = HashSet::new();
    for _ in 0..50 {
        let task_id = dispatcher
            .submit(|| Ok(TaskOutcome::Message(String::new())))
            .unwrap();
        assert!(seen.insert(task_id));
    }
    assert_eq!(dispatcher.pending().unwrap(), 50);
}

#[test]
fn shutdown_forgets_outstanding_ids_but_stays_usable() {
    let dispatcher = dispatcher();
    let stale = dispatcher
        .submit(|| Ok(TaskOutcome::Message("stale".to_string())))
        .unwrap();

    dispatcher.shutdown(true).unwrap();
    assert_eq!(dispatcher.pending().unwrap(), 0);
    let err = dispatcher.wait(stale, WAIT).unwrap_err();
    assert!(matches!(err, AutomationError::InvalidArgument(_)), "{err}");

    let fresh = dispatcher
        .submit(|| Ok(TaskOutcome::Message("fresh".to_string())))
        .unwrap();
    match dispatcher.wait(fresh, WAIT).unwrap() {
        TaskOutcome::Message(message) => assert_eq!(message, "fresh"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn shutdown_without_waiting_abandons_in_flight_work() {
    let dispatcher = dispatcher();
    dispatcher
        .submit(|| {
            thread::sleep(Duration::from_millis(200));
            Ok(TaskOutcome::Message("ignored".to_string()))
        })
        .unwrap();

    let start = Instant::now();
    dispatcher.shutdown(false).unwrap();
    assert!(start.elapsed() < Duration::from_millis(150));
    assert_eq!(dispatcher.pending().unwrap(), 0);
}

// Library-level async keyword flow against the mock SDK.

#[test]
fn async_click_runs_off_thread_and_reports_back() {
    let provider = MockProvider::new(vec![MockWindow::new("Main").with_control(
        "name:Slow",
        MockControl::new("Slow").op_delay(Duration::from_millis(150)),
    )]);
    let library = library_over(provider.clone());
    library
        .set_current_window(Some("Main"), None, None)
        .unwrap();

    let start = Instant::now();
    let task_id = library.async_click_control("name:Slow", None).unwrap();
    assert!(start.elapsed() < Duration::from_millis(100), "submit blocked");

    match library.wait_for_async_task(task_id, Some(WAIT)).unwrap() {
        TaskOutcome::Message(message) => assert!(message.contains("name:Slow"), "{message}"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        provider.window("Main").control("name:Slow").clicks.load(Ordering::SeqCst),
        1
    );
}

#[test]
fn async_type_into_delivers_the_text() {
    let provider = MockProvider::new(vec![
        MockWindow::new("Main").with_control("name:Input", MockControl::new("Input")),
    ]);
    let library = library_over(provider.clone());
    library
        .set_current_window(Some("Main"), None, None)
        .unwrap();

    let task_id = library
        .async_type_into_control("name:Input", "hello", None)
        .unwrap();
    library.wait_for_async_task(task_id, Some(WAIT)).unwrap();
    assert_eq!(
        provider.window("Main").control("name:Input").typed.lock().unwrap().as_slice(),
        ["hello"]
    );
}

#[test]
fn async_find_all_returns_control_handles() {
    let provider = MockProvider::new(vec![MockWindow::new("Main")
        .with_control("class:Edit", MockControl::new("First"))
        .with_control("class:Edit", MockControl::new("Second"))]);
    let library = library_over(provider);
    library
        .set_current_window(Some("Main"), None, None)
        .unwrap();

    let task_id = library.async_find_all_controls("class:Edit", None).unwrap();
    match library.wait_for_async_task(task_id, Some(WAIT)).unwrap() {
        TaskOutcome::Controls(controls) => {
            assert_eq!(controls.len(), 2);
            assert_eq!(controls[0].name(), "First");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn async_submission_without_a_current_window_fails_fast() {
    let provider = MockProvider::empty();
    let library = library_over(provider);

    let err = library.async_click_control("name:OK", None).unwrap_err();
    assert!(matches!(err, AutomationError::NoActiveWindow(_)), "{err}");
}

#[test]
fn async_task_failures_surface_through_wait() {
    let provider = MockProvider::new(vec![MockWindow::new("Main")]);
    let library = library_over(provider);
    library
        .set_current_window(Some("Main"), None, None)
        .unwrap();

    let task_id = library
        .async_click_control("name:Ghost", Some(Duration::from_millis(100)))
        .unwrap();
    let err = library.wait_for_async_task(task_id, Some(WAIT)).unwrap_err();
    match err {
        AutomationError::AsyncOperation(msg) => {
            assert!(msg.contains("name:Ghost"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
