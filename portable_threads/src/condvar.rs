//! Condition-variable adapter
//!
//! Wraps the kernel wait queue, converting portable deadlines to the
//! kernel's nanosecond unit and validating the one hard precondition the
//! kernel imposes: the waited-on mutex must be the plain (non-recursive)
//! variant. A recursive mutex carries an acquisition count the kernel wait
//! cannot release and reacquire correctly, so the combination is rejected
//! up front instead of being allowed to misbehave.

use crate::error::{ThreadError, ThreadResult};
use crate::mutex::Mutex;
use crate::time::{TimeSpec, WAIT_UNBOUNDED};
use kernel_substrate::KernelCondvar;

/// A portable condition variable
///
/// Destruction is a no-op; the kernel wait-queue object needs no explicit
/// release.
pub struct Cond {
    queue: KernelCondvar,
}

impl Cond {
    /// Creates a condition variable with no waiters
    pub fn new() -> Self {
        Self {
            queue: KernelCondvar::new(),
        }
    }

    /// Wakes at most one blocked waiter
    pub fn signal(&self) -> ThreadResult<()> {
        self.queue
            .wake_one()
            .map_err(|_| ThreadError::KernelOperationFailed)
    }

    /// Wakes every blocked waiter
    pub fn broadcast(&self) -> ThreadResult<()> {
        self.queue
            .wake_all()
            .map_err(|_| ThreadError::KernelOperationFailed)
    }

    /// Waits until signaled or broadcast
    ///
    /// Equivalent to [`timed_wait`](Self::timed_wait) with an unbounded
    /// deadline. The calling context must hold `mutex`; the kernel releases
    /// it and parks as one atomic step, then reacquires it before
    /// returning.
    pub fn wait(&self, mutex: &Mutex) -> ThreadResult<()> {
        self.wait_nanos(mutex, WAIT_UNBOUNDED)
    }

    /// Waits until signaled, broadcast, or the deadline elapses
    ///
    /// Fails with `InvalidArgument` - without blocking - if `mutex` is not
    /// the plain variant. The deadline is converted to kernel nanoseconds
    /// and passed through unchanged. A timed-out wait surfaces as
    /// `KernelOperationFailed`; no distinct timeout status crosses this
    /// boundary.
    pub fn timed_wait(&self, mutex: &Mutex, deadline: TimeSpec) -> ThreadResult<()> {
        self.wait_nanos(mutex, deadline.to_nanos())
    }

    fn wait_nanos(&self, mutex: &Mutex, timeout_ns: u64) -> ThreadResult<()> {
        let lock = mutex.plain().ok_or(ThreadError::InvalidArgument)?;
        self.queue
            .wait_timeout(lock, timeout_ns)
            .map_err(|_| ThreadError::KernelOperationFailed)
    }
}

impl Default for Cond {
    fn default() -> Self {
        Self::new()
    }
}
