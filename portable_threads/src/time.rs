//! Time values and conversion to the kernel's nanosecond unit

use serde::{Deserialize, Serialize};

pub use kernel_substrate::WAIT_UNBOUNDED;

const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_MILLI: u64 = 1_000_000;

/// A (seconds, nanoseconds) time value
///
/// Both fields are non-negative. The conversion to kernel nanoseconds is
/// exact and unchecked: callers must supply values whose total fits in a
/// `u64`. The "wait indefinitely" case is never expressed as a `TimeSpec`;
/// unbounded waiters pass [`WAIT_UNBOUNDED`] explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: u64,
    pub nanoseconds: u64,
}

impl TimeSpec {
    /// The zero duration
    pub const ZERO: TimeSpec = TimeSpec {
        seconds: 0,
        nanoseconds: 0,
    };

    /// Creates a time value from a (seconds, nanoseconds) pair
    pub const fn new(seconds: u64, nanoseconds: u64) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Creates a time value from whole seconds
    pub const fn from_secs(seconds: u64) -> Self {
        Self::new(seconds, 0)
    }

    /// Creates a time value from milliseconds
    pub const fn from_millis(millis: u64) -> Self {
        Self::new(
            millis / 1_000,
            (millis % 1_000) * NANOS_PER_MILLI,
        )
    }

    /// Creates a time value from nanoseconds
    pub const fn from_nanos(nanos: u64) -> Self {
        Self::new(nanos / NANOS_PER_SEC, nanos % NANOS_PER_SEC)
    }

    /// Converts to the kernel's single nanosecond count
    pub const fn to_nanos(&self) -> u64 {
        self.seconds * NANOS_PER_SEC + self.nanoseconds
    }
}
