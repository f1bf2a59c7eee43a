//! # Threading Conformance Tests
//!
//! Cross-crate races and stress runs for the portable threading runtime.
//!
//! ## Philosophy
//!
//! - **Race the real thing**: every test drives the portable surface with
//!   threads created by the portable surface itself, not the host's
//! - **Assert observable protocol**: lifecycle ordering is checked against
//!   the substrate's recorded trace, not instrumented internals
//! - **Stress where it matters**: the exactly-once and mutual-exclusion
//!   guarantees are exercised with enough contenders to make a broken
//!   implementation fail in practice, not just in theory
//!
//! Single-component behavior is covered by the inline tests next to each
//! module; this crate holds what needs more than one crate or more than a
//! couple of threads.

pub mod support {
    use portable_threads::thread::{self, Thread};

    /// Spawns `count` portable threads and returns their handles
    ///
    /// Panics on spawn failure; conformance tests treat an unavailable
    /// context as a harness error, not a test outcome.
    pub fn spawn_contenders<F>(count: usize, entry: F) -> Vec<Thread>
    where
        F: Fn() -> i32 + Clone + Send + 'static,
    {
        (0..count)
            .map(|_| {
                let entry = entry.clone();
                thread::spawn(move || entry()).expect("spawn contender")
            })
            .collect()
    }

    /// Joins every handle, asserting each exit code is zero
    pub fn join_all(threads: Vec<Thread>) {
        for thread in threads {
            assert_eq!(thread.join(), Ok(0));
        }
    }
}

#[cfg(test)]
mod call_once;
#[cfg(test)]
mod exclusion;
#[cfg(test)]
mod lifecycle;
#[cfg(test)]
mod wakeup;
