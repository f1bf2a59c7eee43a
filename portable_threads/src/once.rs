//! One-time initialization
//!
//! A three-state machine built from the mutex and condition-variable
//! adapters. The status only moves forward: NotStarted -> Running -> Done.
//! The single caller that wins the NotStarted -> Running transition runs
//! the callback with no lock held - the callback may itself take locks or
//! use another flag without deadlocking against this engine - then marks
//! Done and broadcasts. Every other caller parks until Done.

use crate::condvar::Cond;
use crate::mutex::{Mutex, MutexKind};
use std::sync::atomic::{AtomicU8, Ordering};

const NOT_STARTED: u8 = 0;
const RUNNING: u8 = 1;
const DONE: u8 = 2;

/// A flag guaranteeing its callback runs exactly once
///
/// Shared by reference between any number of racing callers. Each flag
/// guards one initialization.
pub struct OnceFlag {
    lock: Mutex,
    cond: Cond,
    /// Guarded by `lock`; atomic only so the flag is shareable
    status: AtomicU8,
}

impl OnceFlag {
    /// Creates a flag in the not-started state
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(MutexKind::Plain),
            cond: Cond::new(),
            status: AtomicU8::new(NOT_STARTED),
        }
    }

    /// Returns true once the callback has fully returned
    pub fn is_completed(&self) -> bool {
        self.status.load(Ordering::Acquire) == DONE
    }

    /// Runs `callback` if no caller has before, otherwise blocks until the
    /// one execution has completed
    ///
    /// No caller returns before the callback has fully returned.
    pub fn call_once(&self, callback: impl FnOnce()) {
        // The internal pair cannot fail: the mutex is plain and the
        // handles are valid by construction.
        let _ = self.lock.lock();

        if self.status.load(Ordering::Relaxed) == NOT_STARTED {
            self.status.store(RUNNING, Ordering::Relaxed);
            let _ = self.lock.unlock();

            callback();

            let _ = self.lock.lock();
            self.status.store(DONE, Ordering::Release);
            let _ = self.cond.broadcast();
        } else {
            // Re-check on every wake; wakeups may be spurious.
            while self.status.load(Ordering::Relaxed) == RUNNING {
                let _ = self.cond.wait(&self.lock);
            }
        }

        let _ = self.lock.unlock();
    }
}

impl Default for OnceFlag {
    fn default() -> Self {
        Self::new()
    }
}
