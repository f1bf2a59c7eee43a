//! Kernel wait queue
//!
//! [`KernelCondvar`] is the substrate's wake-one/wake-all wait queue. It is
//! keyed to the non-recursive [`KernelMutex`]: the waiter's lock is released
//! and the context parked as one atomic step with respect to wakes from
//! other contexts, so no wake issued after the release can be lost.

use crate::error::{KernelError, KernelResult};
use crate::mutex::{lock_unpoisoned, KernelMutex};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Timeout value meaning "wait indefinitely"
///
/// Callers that want an unbounded wait pass this explicitly; it is never
/// produced by a time conversion.
pub const WAIT_UNBOUNDED: u64 = u64::MAX;

/// Kernel condition variable
///
/// Wakes are tracked with a generation counter. A waiter records the
/// generation while still holding the queue's internal lock - before its
/// caller-supplied mutex is released - and parks until the generation
/// moves, which makes the release-and-park step atomic with respect to
/// [`wake_one`](KernelCondvar::wake_one) and
/// [`wake_all`](KernelCondvar::wake_all).
pub struct KernelCondvar {
    generation: Mutex<u64>,
    queue: Condvar,
}

impl KernelCondvar {
    /// Creates an empty wait queue
    pub fn new() -> Self {
        Self {
            generation: Mutex::new(0),
            queue: Condvar::new(),
        }
    }

    /// Releases `mutex`, parks the calling context, and reacquires `mutex`
    /// before returning
    ///
    /// `timeout_ns` is a nanosecond count; [`WAIT_UNBOUNDED`] parks until a
    /// wake arrives. Returns `Err(TimedOut)` when the timeout elapses first.
    /// The caller must hold `mutex`.
    pub fn wait_timeout(&self, mutex: &KernelMutex, timeout_ns: u64) -> KernelResult<()> {
        let mut generation = lock_unpoisoned(&self.generation);
        let entered = *generation;
        // The queue's internal lock is held, so a wake issued from this
        // point on will bump the generation we just read.
        mutex.unlock();

        let result = if timeout_ns == WAIT_UNBOUNDED {
            while *generation == entered {
                generation = self
                    .queue
                    .wait(generation)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            Ok(())
        } else {
            let deadline = Instant::now().checked_add(Duration::from_nanos(timeout_ns));
            loop {
                if *generation != entered {
                    break Ok(());
                }
                let budget = match deadline {
                    // A timeout too large to represent never elapses.
                    None => Duration::from_secs(u64::MAX),
                    Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                        Some(budget) => budget,
                        None => break Err(KernelError::TimedOut),
                    },
                };
                generation = self
                    .queue
                    .wait_timeout(generation, budget)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
        };

        drop(generation);
        mutex.lock();
        result
    }

    /// Wakes at most one parked waiter
    pub fn wake_one(&self) -> KernelResult<()> {
        {
            let mut generation = lock_unpoisoned(&self.generation);
            *generation = generation.wrapping_add(1);
        }
        self.queue.notify_one();
        Ok(())
    }

    /// Wakes every parked waiter
    pub fn wake_all(&self) -> KernelResult<()> {
        {
            let mut generation = lock_unpoisoned(&self.generation);
            *generation = generation.wrapping_add(1);
        }
        self.queue.notify_all();
        Ok(())
    }
}

impl Default for KernelCondvar {
    fn default() -> Self {
        Self::new()
    }
}
