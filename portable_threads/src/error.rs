//! Portable status codes

use thiserror::Error;

/// Status returned by every fallible portable operation
///
/// `WouldBlock` is a distinct variant rather than a generic failure so a
/// caller polling with `try_lock` can tell contention from a real fault.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ThreadError {
    /// A precondition on the arguments was violated, such as waiting on a
    /// condition variable with a recursive mutex
    #[error("invalid argument")]
    InvalidArgument,

    /// The kernel could not provide the resources for the operation
    #[error("out of memory")]
    ResourceExhausted,

    /// The lock was not immediately available
    #[error("resource is busy")]
    WouldBlock,

    /// An underlying kernel call reported failure
    #[error("kernel operation failed")]
    KernelOperationFailed,
}

/// Result alias for portable operations
pub type ThreadResult<T> = Result<T, ThreadError>;
