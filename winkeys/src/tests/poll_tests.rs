use std::time::{Duration, Instant};

use crate::poll::wait_until;

#[test]
fn immediate_success_returns_without_sleeping() {
    let start = Instant::now();
    let result = wait_until(
        || Some(42),
        Duration::from_secs(5),
        Duration::from_millis(200),
    );
    assert_eq!(result, Some(42));
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[test]
fn succeeds_once_the_probe_starts_yielding() {
    let mut attempts = 0;
    let result = wait_until(
        || {
            attempts += 1;
            (attempts >= 4).then_some(attempts)
        },
        Duration::from_secs(2),
        Duration::from_millis(10),
    );
    assert_eq!(result, Some(4));
}

#[test]
fn gives_up_after_the_timeout() {
    let timeout = Duration::from_millis(200);
    let interval = Duration::from_millis(40);
    let mut attempts = 0;
    let start = Instant::now();
    let result: Option<()> = wait_until(
        || {
            attempts += 1;
            None
        },
        timeout,
        interval,
    );
    let elapsed = start.elapsed();
    assert_eq!(result, None);
    assert!(attempts > 1, "should have retried, got {attempts} attempts");
    assert!(elapsed >= timeout, "gave up early after {elapsed:?}");
    // One trailing interval plus scheduler slack is acceptable.
    assert!(elapsed < timeout + interval + Duration::from_millis(500));
}

#[test]
fn zero_timeout_still_probes_once() {
    let mut attempts = 0;
    let result: Option<()> = wait_until(
        || {
            attempts += 1;
            None
        },
        Duration::ZERO,
        Duration::from_millis(10),
    );
    assert_eq!(result, None);
    assert_eq!(attempts, 1);
}
