//! Bounded cooperative polling: retry a probe until it yields or a timeout
//! elapses. Every wait-for-window/control/condition operation goes through
//! [`wait_until`].

use std::thread;
use std::time::{Duration, Instant};

/// Repeatedly invoke `probe` until it returns `Some`, sleeping `interval`
/// between attempts. Returns `None` once the elapsed time reaches `timeout`.
///
/// Timing out is a normal outcome here, not an error; callers decide what a
/// missed deadline means. Call sites are expected to collapse transient probe
/// failures to `None` so an unreliable UI surface does not abort the poll.
///
/// Blocks the calling thread for up to `timeout` and has no cancellation
/// mechanism beyond the timeout itself.
pub fn wait_until<T>(
    mut probe: impl FnMut() -> Option<T>,
    timeout: Duration,
    interval: Duration,
) -> Option<T> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = probe() {
            return Some(value);
        }
        if Instant::now() >= deadline {
            return None;
        }
        thread::sleep(interval);
    }
}
