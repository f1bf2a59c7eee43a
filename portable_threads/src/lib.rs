//! # Portable Threads
//!
//! A standard blocking threading surface - mutexes, condition variables,
//! one-time initialization, thread create/join/exit/sleep/yield - mapped
//! onto the kernel primitives in `kernel_substrate`.
//!
//! ## Philosophy
//!
//! **The hard part is the mapping discipline, not any single primitive.**
//!
//! The kernel side speaks nanoseconds, handle-based identity, two
//! incompatible lock variants, and an explicit create/start/close protocol.
//! The portable side speaks (seconds, nanoseconds) pairs, one mutex type,
//! and a single spawn-and-join lifecycle. Each module here owns one piece
//! of that translation and nothing else:
//!
//! - [`time`]: (seconds, nanoseconds) to the kernel's nanosecond unit
//! - [`mutex`]: one tagged handle over the two kernel lock variants
//! - [`condvar`]: wait/signal/broadcast with timeout conversion, valid only
//!   on the plain lock variant
//! - [`once`]: exactly-once initialization built from the two adapters
//! - [`thread`]: creation handshake, identity, exit-code propagation, join
//!
//! ## Error model
//!
//! Every fallible operation returns a small status enum, not a rich error
//! object. Callers check the status after every call; nothing unwinds
//! across this crate's boundary.

pub mod condvar;
pub mod error;
pub mod mutex;
pub mod once;
pub mod thread;
pub mod time;

pub use condvar::Cond;
pub use error::{ThreadError, ThreadResult};
pub use mutex::{Mutex, MutexKind};
pub use once::OnceFlag;
pub use thread::Thread;
pub use time::{TimeSpec, WAIT_UNBOUNDED};
