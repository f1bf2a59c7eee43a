//! Condition-variable wakeups across portable threads

use crate::support;
use portable_threads::{Cond, Mutex, MutexKind, ThreadError, TimeSpec};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A bounded ticket dispenser: waiters park until a ticket is posted.
struct TicketBooth {
    mutex: Mutex,
    posted: Cond,
    tickets: AtomicUsize,
}

impl TicketBooth {
    fn new() -> Self {
        Self {
            mutex: Mutex::new(MutexKind::Plain),
            posted: Cond::new(),
            tickets: AtomicUsize::new(0),
        }
    }

    fn take(&self) {
        self.mutex.lock().unwrap();
        loop {
            let available = self.tickets.load(Ordering::Relaxed);
            if available > 0 {
                self.tickets.store(available - 1, Ordering::Relaxed);
                break;
            }
            self.posted.wait(&self.mutex).unwrap();
        }
        self.mutex.unlock().unwrap();
    }

    fn post(&self, count: usize) {
        self.mutex.lock().unwrap();
        let available = self.tickets.load(Ordering::Relaxed);
        self.tickets.store(available + count, Ordering::Relaxed);
        if count == 1 {
            self.posted.signal().unwrap();
        } else {
            self.posted.broadcast().unwrap();
        }
        self.mutex.unlock().unwrap();
    }
}

#[test]
fn test_every_posted_ticket_is_consumed() {
    let booth = Arc::new(TicketBooth::new());
    let consumers = 8;
    let tickets_each = 50;

    let threads = {
        let booth = Arc::clone(&booth);
        support::spawn_contenders(consumers, move || {
            for _ in 0..tickets_each {
                booth.take();
            }
            0
        })
    };

    for _ in 0..(consumers * tickets_each) {
        booth.post(1);
    }
    support::join_all(threads);

    assert_eq!(booth.tickets.load(Ordering::Relaxed), 0);
}

#[test]
fn test_broadcast_releases_a_full_cohort() {
    let booth = Arc::new(TicketBooth::new());
    let consumers = 16;

    let threads = {
        let booth = Arc::clone(&booth);
        support::spawn_contenders(consumers, move || {
            booth.take();
            0
        })
    };

    booth.post(consumers);
    support::join_all(threads);
}

#[test]
fn test_timed_wait_gives_up_while_others_hold_tickets() {
    let mutex = Mutex::new(MutexKind::Plain);
    let cond = Cond::new();

    // Nothing will ever signal; the wait must end at the deadline with a
    // non-success status.
    mutex.lock().unwrap();
    let started = Instant::now();
    let result = cond.timed_wait(&mutex, TimeSpec::from_millis(80));
    let elapsed = started.elapsed();
    mutex.unlock().unwrap();

    assert_eq!(result, Err(ThreadError::KernelOperationFailed));
    assert!(elapsed >= Duration::from_millis(70), "woke early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(10), "unbounded wait: {:?}", elapsed);
}
