//! Scheduler entry points
//!
//! Two ways to give up the processor: a timed sleep and a quantum yield.

use std::time::Duration;

/// Blocks the calling context for at least `timeout_ns` nanoseconds
pub fn sleep(timeout_ns: u64) {
    std::thread::sleep(Duration::from_nanos(timeout_ns));
}

/// Deprioritizes the calling context for one scheduling quantum
///
/// No fixed wake time; the context is runnable again immediately.
pub fn yield_now() {
    std::thread::yield_now();
}
