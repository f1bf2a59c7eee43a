//! Substrate error types

use thiserror::Error;

/// Errors reported by substrate primitives
///
/// Locks never fail: acquisition blocks and release is unconditional, so
/// only the wait queue, the thread-object protocol, and process queries
/// carry a result code.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// A timed wait elapsed before a wake arrived
    #[error("wait timed out")]
    TimedOut,

    /// The thread object is not in a state that permits the operation
    #[error("thread object is not in a valid state for this operation")]
    InvalidState,

    /// The thread object was already closed
    #[error("thread handle is already closed")]
    HandleClosed,

    /// The kernel could not provide a new execution context
    #[error("out of thread resources")]
    OutOfResources,

    /// A process information query failed
    #[error("process information query failed")]
    InfoQueryFailed,
}

/// Result alias for substrate operations
pub type KernelResult<T> = Result<T, KernelError>;
