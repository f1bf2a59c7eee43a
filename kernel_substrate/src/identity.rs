//! Per-context identity handles
//!
//! Every execution context in the process has a `RawHandle`. Contexts
//! started through [`crate::ThreadObject`] inherit the handle of their
//! object; any other context (the process main thread, threads spawned
//! outside the substrate) is assigned a fresh handle the first time it asks
//! for one. The accessor is read-only: nothing outside this module can
//! change a context's identity once it is set.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of an execution context
///
/// Handles are never zero and never reused within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawHandle(u64);

impl RawHandle {
    /// Returns the numeric handle value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thread({})", self.0)
    }
}

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Allocates a fresh, process-unique handle
pub(crate) fn allocate_handle() -> RawHandle {
    RawHandle(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
}

thread_local! {
    static CURRENT_HANDLE: Cell<Option<RawHandle>> = Cell::new(None);
}

/// Returns the calling context's own handle
///
/// For substrate-created threads this is the handle of the `ThreadObject`
/// that started them. For ambient threads a handle is assigned lazily and
/// remains stable for the life of the thread.
pub fn current_handle() -> RawHandle {
    CURRENT_HANDLE.with(|slot| match slot.get() {
        Some(handle) => handle,
        None => {
            let handle = allocate_handle();
            slot.set(Some(handle));
            handle
        }
    })
}

/// Installs the identity of a substrate-created context
///
/// Called exactly once, by the thread wrapper, before the entry runs.
pub(crate) fn install_current(handle: RawHandle) {
    CURRENT_HANDLE.with(|slot| slot.set(Some(handle)));
}
