//! # Kernel Substrate
//!
//! This crate provides the kernel-level synchronization and scheduling
//! primitives that the portable threading runtime is built on.
//!
//! ## Purpose
//!
//! The portable runtime in `portable_threads` treats the kernel as an
//! opaque collaborator: locks that block without failing, a wait queue
//! keyed to the non-recursive lock type, and thread objects with an
//! explicit create/start/wait/close protocol. This crate supplies that
//! collaborator as a hosted implementation:
//! - Runs under `cargo test`
//! - Blocks for real (contexts park at the OS level, no busy-waiting)
//! - Inspectable (thread lifecycle events are recorded for tests)
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! This is not a mock. Every primitive has the same observable semantics a
//! native kernel would provide - the wait/wake ordering guarantees, the
//! handle-based thread identity, the start handshake protocol - it just
//! happens to be hosted on the standard library so the runtime above it can
//! be raced, timed, and asserted against in ordinary tests.

pub mod condvar;
pub mod error;
pub mod identity;
pub mod mutex;
pub mod process;
pub mod scheduler;
pub mod thread;
pub mod trace;

pub use condvar::{KernelCondvar, WAIT_UNBOUNDED};
pub use error::{KernelError, KernelResult};
pub use identity::{current_handle, RawHandle};
pub use mutex::{KernelMutex, KernelRecursiveMutex};
pub use thread::ThreadObject;
pub use trace::ThreadEvent;
