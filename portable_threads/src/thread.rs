//! Thread lifecycle
//!
//! Creation runs a fixed protocol against the kernel: query the creator's
//! core-affinity mask, create the thread object, propagate the mask, start
//! the context, then rendezvous with it before returning. The rendezvous
//! guarantees that a handle returned by [`spawn`] refers to a context that
//! is actually running and has captured everything it needs from the
//! creator. Any kernel failure after the object exists unwinds by closing
//! the object before the error is reported.
//!
//! A thread's exit code is written only by the thread itself, through
//! [`exit`] or by returning from its entry, and read only by the joiner
//! after the kernel confirms termination. The join releases the record;
//! `join` consumes the handle so that release happens at most once per
//! handle.
//!
//! Thread detachment is deliberately absent from this surface.

use crate::condvar::Cond;
use crate::error::{ThreadError, ThreadResult};
use crate::mutex::{Mutex, MutexKind};
use crate::time::TimeSpec;
use kernel_substrate::{process, scheduler, KernelError, RawHandle, ThreadObject};
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, OnceLock};

/// Stack size for created threads
const STACK_SIZE: usize = 128 * 1024;
/// Priority handed to the kernel at creation
const PRIORITY: i32 = 0x3B;
/// Placement value asking the kernel to use the creator's current core
const IDEAL_CORE: i32 = -2;

enum Origin {
    /// Created through [`spawn`]; owns the kernel thread object
    Spawned(ThreadObject),
    /// A context this runtime did not create (e.g. the process main
    /// thread); it has an identity but cannot be joined
    Ambient,
}

struct ThreadRecord {
    handle: RawHandle,
    origin: Origin,
    /// Written by the thread itself before it terminates, read by the
    /// joiner after termination completes
    exit_code: AtomicI32,
}

impl ThreadRecord {
    fn object(&self) -> Option<&ThreadObject> {
        match &self.origin {
            Origin::Spawned(object) => Some(object),
            Origin::Ambient => None,
        }
    }
}

thread_local! {
    static CURRENT: RefCell<Option<Arc<ThreadRecord>>> = RefCell::new(None);
}

/// Rendezvous shared between the creator and the new context
///
/// The creator parks on `started_cond` until the new context has installed
/// its identity and set `started` under `started_lock`; only then does
/// [`spawn`] return.
struct StartHandshake {
    record: OnceLock<Arc<ThreadRecord>>,
    started_lock: Mutex,
    started_cond: Cond,
    /// Guarded by `started_lock`; atomic only so the handshake is sendable
    started: AtomicBool,
}

fn map_kernel(error: KernelError) -> ThreadError {
    match error {
        KernelError::OutOfResources => ThreadError::ResourceExhausted,
        _ => ThreadError::KernelOperationFailed,
    }
}

/// A handle to a created thread
///
/// Handles compare equal when they refer to the same kernel-level thread
/// identity. `join` consumes the handle, so each handle is joined at most
/// once.
pub struct Thread {
    record: Arc<ThreadRecord>,
}

impl Thread {
    /// Returns the kernel identity of the thread
    pub fn id(&self) -> RawHandle {
        self.record.handle
    }

    /// Blocks until the thread terminates and returns its exit code
    ///
    /// On successful termination the recorded exit code is returned, the
    /// kernel thread object is closed, and the record is released. A
    /// failing close is reported after the code was already captured, but
    /// the record is released regardless. Joining an ambient handle (one
    /// obtained from [`current`] on a thread this runtime did not create)
    /// fails with `InvalidArgument`.
    pub fn join(self) -> ThreadResult<i32> {
        let object = match self.record.object() {
            Some(object) => object,
            None => return Err(ThreadError::InvalidArgument),
        };
        object.wait_for_exit().map_err(map_kernel)?;
        let code = self.record.exit_code.load(Ordering::Acquire);
        object.close().map_err(map_kernel)?;
        Ok(code)
    }
}

impl PartialEq for Thread {
    fn eq(&self, other: &Self) -> bool {
        self.record.handle == other.record.handle
    }
}

impl Eq for Thread {}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("handle", &self.record.handle)
            .finish()
    }
}

/// Creates a thread running `entry` and returns once it is running
///
/// The protocol: query the creator's core-affinity mask, create the kernel
/// thread object, propagate the mask onto it, start it, then block until
/// the new context signals that it has captured its start parameters. A
/// kernel failure at any step after the object exists closes the object
/// before the failure is reported.
///
/// The entry's return value becomes the thread's exit code, delivered
/// through [`exit`].
pub fn spawn<F>(entry: F) -> ThreadResult<Thread>
where
    F: FnOnce() -> i32 + Send + 'static,
{
    let core_mask = process::core_mask().map_err(map_kernel)?;

    let handshake = Arc::new(StartHandshake {
        record: OnceLock::new(),
        started_lock: Mutex::new(MutexKind::Plain),
        started_cond: Cond::new(),
        started: AtomicBool::new(false),
    });

    let trampoline = {
        let handshake = Arc::clone(&handshake);
        move || {
            // The creator deposits the record before start(), so it is
            // present by the time this context runs.
            if let Some(record) = handshake.record.get() {
                let record = Arc::clone(record);
                CURRENT.with(|current| *current.borrow_mut() = Some(record));
            }

            let _ = handshake.started_lock.lock();
            handshake.started.store(true, Ordering::Relaxed);
            let _ = handshake.started_cond.signal();
            let _ = handshake.started_lock.unlock();

            let code = entry();
            exit(code)
        }
    };

    let object =
        ThreadObject::create(trampoline, STACK_SIZE, PRIORITY, IDEAL_CORE).map_err(map_kernel)?;

    if let Err(error) = object.set_core_mask(IDEAL_CORE, core_mask) {
        let _ = object.close();
        return Err(map_kernel(error));
    }

    let record = Arc::new(ThreadRecord {
        handle: object.handle(),
        origin: Origin::Spawned(object),
        exit_code: AtomicI32::new(0),
    });
    let _ = handshake.record.set(Arc::clone(&record));

    if let Some(object) = record.object() {
        if let Err(error) = object.start() {
            let _ = object.close();
            return Err(map_kernel(error));
        }
    }

    // Block until the new context has captured its start parameters; the
    // returned handle must not be usable before the context is actually
    // running.
    let _ = handshake.started_lock.lock();
    while !handshake.started.load(Ordering::Relaxed) {
        let _ = handshake.started_cond.wait(&handshake.started_lock);
    }
    let _ = handshake.started_lock.unlock();

    Ok(Thread { record })
}

/// Returns a handle to the calling thread
///
/// The identity comes from the kernel layer's per-context accessor, not
/// from any value recorded at creation. On a thread this runtime did not
/// create, a non-joinable ambient handle is synthesized once and reused.
pub fn current() -> Thread {
    CURRENT.with(|current| {
        let mut slot = current.borrow_mut();
        let record = match slot.as_ref() {
            Some(record) => Arc::clone(record),
            None => {
                let record = Arc::new(ThreadRecord {
                    handle: kernel_substrate::current_handle(),
                    origin: Origin::Ambient,
                    exit_code: AtomicI32::new(0),
                });
                *slot = Some(Arc::clone(&record));
                record
            }
        };
        Thread { record }
    })
}

/// Terminates the calling thread with the given exit code; never returns
///
/// The code is recorded in the thread's record for the joiner, then the
/// context is terminated at the kernel level. On an ambient context the
/// code has nowhere to land; the context still terminates.
pub fn exit(code: i32) -> ! {
    CURRENT.with(|current| {
        if let Some(record) = current.borrow().as_ref() {
            record.exit_code.store(code, Ordering::Release);
        }
    });
    process::exit_current()
}

/// Blocks the calling thread for at least `duration`
///
/// Always reports zero remaining time: early wakeups that would leave a
/// remainder are not supported.
pub fn sleep(duration: TimeSpec) -> TimeSpec {
    scheduler::sleep(duration.to_nanos());
    TimeSpec::ZERO
}

/// Asks the scheduler to deprioritize the calling thread for one quantum
pub fn yield_now() {
    scheduler::yield_now();
}
