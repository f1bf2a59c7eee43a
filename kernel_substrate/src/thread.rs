//! Kernel thread objects
//!
//! A [`ThreadObject`] separates creation from execution: `create` captures
//! the entry and the placement parameters without running anything, `start`
//! hands the entry to a fresh execution context, `wait_for_exit` parks the
//! caller until that context terminates, and `close` releases the kernel
//! side of the object. Each step reports its own result code.
//!
//! The wrapper installed around the entry publishes the object's handle as
//! the new context's identity before the entry runs, and absorbs the
//! unwind marker used by [`crate::process::exit_current`] so an early exit
//! terminates exactly one context.

use crate::error::{KernelError, KernelResult};
use crate::identity::{self, RawHandle};
use crate::mutex::lock_unpoisoned;
use crate::trace::{self, ThreadEvent};
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::thread::{Builder, JoinHandle};

/// Unwind payload recognized by the thread wrapper as a deliberate exit
pub(crate) struct ExitThread;

enum ObjectState {
    Created { entry: Box<dyn FnOnce() + Send> },
    Started { join: JoinHandle<()> },
    /// The context has been waited for (or the wait is in progress)
    Waited,
    Closed,
}

/// Core placement recorded by `set_core_mask`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorePlacement {
    pub ideal_core: i32,
    pub affinity_mask: u64,
}

/// A kernel thread object with an explicit lifecycle
///
/// Created -> Started -> Waited -> Closed. `start` is valid only once, on a
/// created object; `close` is valid once in any state and releases the
/// handle.
pub struct ThreadObject {
    handle: RawHandle,
    stack_size: usize,
    priority: i32,
    ideal_core: i32,
    placement: Mutex<Option<CorePlacement>>,
    state: Mutex<ObjectState>,
}

impl ThreadObject {
    /// Creates a thread object without starting it
    ///
    /// `entry` does not run until [`start`](Self::start). The stack size is
    /// applied to the new context; priority and ideal core are recorded on
    /// the object (the host scheduler places contexts itself).
    pub fn create(
        entry: impl FnOnce() + Send + 'static,
        stack_size: usize,
        priority: i32,
        ideal_core: i32,
    ) -> KernelResult<Self> {
        let handle = identity::allocate_handle();
        trace::record(ThreadEvent::Created { handle });
        Ok(Self {
            handle,
            stack_size,
            priority,
            ideal_core,
            placement: Mutex::new(None),
            state: Mutex::new(ObjectState::Created {
                entry: Box::new(entry),
            }),
        })
    }

    /// Returns the object's kernel handle
    pub fn handle(&self) -> RawHandle {
        self.handle
    }

    /// Returns the priority recorded at creation
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the ideal core recorded at creation
    pub fn ideal_core(&self) -> i32 {
        self.ideal_core
    }

    /// Returns the placement recorded by `set_core_mask`, if any
    pub fn placement(&self) -> Option<CorePlacement> {
        *lock_unpoisoned(&self.placement)
    }

    /// Records the core-affinity mask for the context
    ///
    /// Valid on any open object; fails with `HandleClosed` after `close`.
    pub fn set_core_mask(&self, ideal_core: i32, affinity_mask: u64) -> KernelResult<()> {
        let state = lock_unpoisoned(&self.state);
        if matches!(*state, ObjectState::Closed) {
            return Err(KernelError::HandleClosed);
        }
        drop(state);
        *lock_unpoisoned(&self.placement) = Some(CorePlacement {
            ideal_core,
            affinity_mask,
        });
        Ok(())
    }

    /// Starts the context
    ///
    /// Hands the entry to a new execution context and returns once the
    /// context exists. Fails with `InvalidState` if the object was already
    /// started, waited for, or closed, and `OutOfResources` if the host
    /// cannot provide a context.
    pub fn start(&self) -> KernelResult<()> {
        let mut state = lock_unpoisoned(&self.state);
        let entry = match mem::replace(&mut *state, ObjectState::Waited) {
            ObjectState::Created { entry } => entry,
            other => {
                *state = other;
                return Err(KernelError::InvalidState);
            }
        };

        let handle = self.handle;
        let spawned = Builder::new()
            .name(format!("substrate-{}", handle.raw()))
            .stack_size(self.stack_size)
            .spawn(move || {
                identity::install_current(handle);
                trace::record(ThreadEvent::Started { handle });
                let outcome = panic::catch_unwind(AssertUnwindSafe(entry));
                trace::record(ThreadEvent::Exited { handle });
                if let Err(payload) = outcome {
                    // A deliberate exit ends here; anything else keeps
                    // unwinding as an ordinary panic.
                    if !payload.is::<ExitThread>() {
                        panic::resume_unwind(payload);
                    }
                }
            });

        match spawned {
            Ok(join) => {
                *state = ObjectState::Started { join };
                Ok(())
            }
            Err(_) => {
                // The entry was consumed by the failed spawn; the object
                // cannot be restarted.
                *state = ObjectState::Closed;
                Err(KernelError::OutOfResources)
            }
        }
    }

    /// Blocks the calling context until the started context terminates
    ///
    /// Waiting for an already-exited context succeeds immediately. Fails
    /// with `InvalidState` before `start` and `HandleClosed` after `close`.
    pub fn wait_for_exit(&self) -> KernelResult<()> {
        let join = {
            let mut state = lock_unpoisoned(&self.state);
            match mem::replace(&mut *state, ObjectState::Waited) {
                ObjectState::Started { join } => join,
                ObjectState::Waited => return Ok(()),
                ObjectState::Created { entry } => {
                    *state = ObjectState::Created { entry };
                    return Err(KernelError::InvalidState);
                }
                ObjectState::Closed => {
                    *state = ObjectState::Closed;
                    return Err(KernelError::HandleClosed);
                }
            }
        };
        // Park outside the state lock so close() is never blocked behind a
        // long-running context.
        // A context that unwound with a genuine panic still terminated; the
        // wait itself succeeded.
        let _ = join.join();
        Ok(())
    }

    /// Releases the kernel side of the object
    ///
    /// Closing a started-but-unwaited object detaches the running context;
    /// the context itself keeps running. Double close fails with
    /// `HandleClosed`.
    pub fn close(&self) -> KernelResult<()> {
        let mut state = lock_unpoisoned(&self.state);
        match mem::replace(&mut *state, ObjectState::Closed) {
            ObjectState::Closed => Err(KernelError::HandleClosed),
            _ => {
                trace::record(ThreadEvent::Closed {
                    handle: self.handle,
                });
                Ok(())
            }
        }
    }
}
