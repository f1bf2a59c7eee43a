//! Kernel lock primitives
//!
//! Two lock variants with the same surface and incompatible semantics:
//! [`KernelMutex`] is the plain non-recursive lock the wait queue in
//! [`crate::condvar`] is keyed to, and [`KernelRecursiveMutex`] tracks an
//! owner and an acquisition count so the same context may re-enter.
//!
//! Acquisition never fails: `lock` blocks until the lock is held and
//! `try_lock` reports its boolean outcome. Releasing a lock the caller does
//! not hold is a contract violation the substrate does not defend against.

use crate::identity;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Acquires a standard-library mutex, shrugging off poisoning.
///
/// A context that unwinds while holding an internal guard has already
/// terminated; the protected state is a single flag or counter and stays
/// consistent.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Non-recursive kernel lock
///
/// The only lock type the kernel wait queue accepts. A context that
/// acquires this lock twice without an intervening release deadlocks
/// against itself.
pub struct KernelMutex {
    held: Mutex<bool>,
    released: Condvar,
}

impl KernelMutex {
    /// Creates an unlocked mutex
    pub fn new() -> Self {
        Self {
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    /// Acquires the lock, blocking the calling context until it is held
    pub fn lock(&self) {
        let mut held = lock_unpoisoned(&self.held);
        while *held {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
    }

    /// Attempts to acquire the lock without blocking
    pub fn try_lock(&self) -> bool {
        let mut held = lock_unpoisoned(&self.held);
        if *held {
            false
        } else {
            *held = true;
            true
        }
    }

    /// Releases the lock
    ///
    /// The caller must hold the lock; the substrate does not check.
    pub fn unlock(&self) {
        {
            let mut held = lock_unpoisoned(&self.held);
            *held = false;
        }
        self.released.notify_one();
    }
}

impl Default for KernelMutex {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursive kernel lock
///
/// Tracks the owning context by its [`crate::RawHandle`] and counts nested
/// acquisitions. The lock is released to other contexts only when the owner
/// has unlocked as many times as it locked.
pub struct KernelRecursiveMutex {
    inner: KernelMutex,
    /// Handle of the owning context, 0 when unowned
    owner: AtomicU64,
    /// Nested acquisition count; written only by the owner
    depth: AtomicU32,
}

impl KernelRecursiveMutex {
    /// Creates an unlocked recursive mutex
    pub fn new() -> Self {
        Self {
            inner: KernelMutex::new(),
            owner: AtomicU64::new(0),
            depth: AtomicU32::new(0),
        }
    }

    /// Acquires the lock, re-entering if the calling context already owns it
    pub fn lock(&self) {
        let me = identity::current_handle().raw();
        if self.owner.load(Ordering::Acquire) == me {
            self.depth.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.inner.lock();
        self.owner.store(me, Ordering::Release);
        self.depth.store(1, Ordering::Relaxed);
    }

    /// Attempts to acquire the lock without blocking
    pub fn try_lock(&self) -> bool {
        let me = identity::current_handle().raw();
        if self.owner.load(Ordering::Acquire) == me {
            self.depth.fetch_add(1, Ordering::Relaxed);
            return true;
        }
        if self.inner.try_lock() {
            self.owner.store(me, Ordering::Release);
            self.depth.store(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Releases one level of acquisition
    ///
    /// The caller must own the lock; the substrate does not check.
    pub fn unlock(&self) {
        if self.depth.fetch_sub(1, Ordering::Relaxed) == 1 {
            self.owner.store(0, Ordering::Release);
            self.inner.unlock();
        }
    }
}

impl Default for KernelRecursiveMutex {
    fn default() -> Self {
        Self::new()
    }
}
