//! Process-level queries and context termination

use crate::error::{KernelError, KernelResult};
use crate::thread::ExitThread;

/// Returns the current process's core-affinity mask
///
/// One bit per core the process may run on, derived from the host's
/// available parallelism and capped at 64 cores.
pub fn core_mask() -> KernelResult<u64> {
    let cores = std::thread::available_parallelism()
        .map_err(|_| KernelError::InfoQueryFailed)?
        .get()
        .min(64);
    if cores == 64 {
        Ok(u64::MAX)
    } else {
        Ok((1u64 << cores) - 1)
    }
}

/// Terminates the calling execution context and never returns
///
/// Implemented as an unwind with a marker payload that the substrate's
/// thread wrapper recognizes and absorbs. `resume_unwind` bypasses the
/// panic hook, so a deliberate exit is silent.
///
/// Calling this on a context the substrate did not create unwinds out of
/// the caller's stack with a payload nothing will catch.
pub fn exit_current() -> ! {
    std::panic::resume_unwind(Box::new(ExitThread))
}
