//! Thread lifecycle trace
//!
//! The substrate records each thread object's lifecycle transitions in a
//! process-wide log that tests can read back, in the spirit of an audit
//! trail: assertions about protocol ordering (created before started,
//! exited before closed) are made against recorded events rather than
//! instrumented code.

use crate::identity::RawHandle;
use crate::mutex::lock_unpoisoned;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A recorded thread lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadEvent {
    /// The thread object was created (nothing is running yet)
    Created { handle: RawHandle },
    /// The new execution context began running
    Started { handle: RawHandle },
    /// The execution context terminated
    Exited { handle: RawHandle },
    /// The kernel side of the object was released
    Closed { handle: RawHandle },
}

impl ThreadEvent {
    /// Returns the handle the event refers to
    pub fn handle(&self) -> RawHandle {
        match *self {
            ThreadEvent::Created { handle }
            | ThreadEvent::Started { handle }
            | ThreadEvent::Exited { handle }
            | ThreadEvent::Closed { handle } => handle,
        }
    }
}

static EVENTS: Mutex<Vec<ThreadEvent>> = Mutex::new(Vec::new());

pub(crate) fn record(event: ThreadEvent) {
    lock_unpoisoned(&EVENTS).push(event);
}

/// Returns a snapshot of every recorded event, oldest first
pub fn recent_events() -> Vec<ThreadEvent> {
    lock_unpoisoned(&EVENTS).clone()
}

/// Returns the recorded events for one handle, oldest first
pub fn events_for(handle: RawHandle) -> Vec<ThreadEvent> {
    lock_unpoisoned(&EVENTS)
        .iter()
        .copied()
        .filter(|event| event.handle() == handle)
        .collect()
}

/// Clears the trace
///
/// Tests sharing the process-wide log should filter with [`events_for`]
/// instead of clearing, to stay independent of each other.
pub fn clear_events() {
    lock_unpoisoned(&EVENTS).clear();
}
