//! Mutex adapter
//!
//! One portable mutex type over the kernel's two incompatible lock
//! variants. The variant is chosen once at construction and stored as the
//! enum discriminant; every operation dispatches on it for the handle's
//! entire lifetime. There are exactly two variants and no extensibility, so
//! a closed tagged union is used rather than a trait object.
//!
//! Timed acquisition is deliberately absent from this surface: a caller
//! that needs it does not compile.

use crate::error::{ThreadError, ThreadResult};
use kernel_substrate::{KernelMutex, KernelRecursiveMutex};
use serde::{Deserialize, Serialize};

/// The lock variant a [`Mutex`] wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutexKind {
    /// Non-recursive: re-acquisition by the holder deadlocks; the only
    /// variant condition variables accept
    Plain,
    /// Recursive: the owning context may re-enter and must release once per
    /// acquisition
    Recursive,
}

enum Lock {
    Plain(KernelMutex),
    Recursive(KernelRecursiveMutex),
}

/// A portable mutex
///
/// Wraps exactly one kernel lock object, tagged with its variant at
/// construction. Destruction is a no-op; the kernel lock objects need no
/// explicit teardown.
pub struct Mutex {
    lock: Lock,
}

impl Mutex {
    /// Creates a mutex of the given variant
    pub fn new(kind: MutexKind) -> Self {
        let lock = match kind {
            MutexKind::Plain => Lock::Plain(KernelMutex::new()),
            MutexKind::Recursive => Lock::Recursive(KernelRecursiveMutex::new()),
        };
        Self { lock }
    }

    /// Returns the variant chosen at construction
    pub fn kind(&self) -> MutexKind {
        match self.lock {
            Lock::Plain(_) => MutexKind::Plain,
            Lock::Recursive(_) => MutexKind::Recursive,
        }
    }

    /// Blocks the calling context until the lock is held
    ///
    /// The kernel acquires are non-failing, so this succeeds once
    /// dispatched.
    pub fn lock(&self) -> ThreadResult<()> {
        match &self.lock {
            Lock::Plain(lock) => lock.lock(),
            Lock::Recursive(lock) => lock.lock(),
        }
        Ok(())
    }

    /// Attempts to acquire the lock without blocking
    ///
    /// Returns `Err(WouldBlock)` when the lock is not immediately
    /// available, so pollers can distinguish contention from a fault.
    pub fn try_lock(&self) -> ThreadResult<()> {
        let acquired = match &self.lock {
            Lock::Plain(lock) => lock.try_lock(),
            Lock::Recursive(lock) => lock.try_lock(),
        };
        if acquired {
            Ok(())
        } else {
            Err(ThreadError::WouldBlock)
        }
    }

    /// Releases the lock
    ///
    /// The caller must hold the lock; releasing a lock held by another
    /// context is delegated to the kernel's contract and not defended
    /// against here.
    pub fn unlock(&self) -> ThreadResult<()> {
        match &self.lock {
            Lock::Plain(lock) => lock.unlock(),
            Lock::Recursive(lock) => lock.unlock(),
        }
        Ok(())
    }

    /// Returns the kernel lock when this handle wraps the plain variant
    ///
    /// The condition-variable adapter validates its hard precondition
    /// through this accessor.
    pub(crate) fn plain(&self) -> Option<&KernelMutex> {
        match &self.lock {
            Lock::Plain(lock) => Some(lock),
            Lock::Recursive(_) => None,
        }
    }
}
