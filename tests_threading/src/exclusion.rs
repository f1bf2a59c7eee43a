//! Mutual exclusion under portable threads

use crate::support;
use portable_threads::{Mutex, MutexKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const CONTENDERS: usize = 8;
const ITERATIONS: u64 = 500;

fn contended_counter(kind: MutexKind) {
    let mutex = Arc::new(Mutex::new(kind));
    let counter = Arc::new(AtomicU64::new(0));

    let threads = {
        let mutex = Arc::clone(&mutex);
        let counter = Arc::clone(&counter);
        support::spawn_contenders(CONTENDERS, move || {
            for _ in 0..ITERATIONS {
                mutex.lock().unwrap();
                // Split read-modify-write: a broken lock loses updates.
                let value = counter.load(Ordering::Relaxed);
                portable_threads::thread::yield_now();
                counter.store(value + 1, Ordering::Relaxed);
                mutex.unlock().unwrap();
            }
            0
        })
    };
    support::join_all(threads);

    assert_eq!(
        counter.load(Ordering::Relaxed),
        CONTENDERS as u64 * ITERATIONS
    );
}

#[test]
fn test_plain_mutex_excludes_contenders() {
    contended_counter(MutexKind::Plain);
}

#[test]
fn test_recursive_mutex_excludes_contenders() {
    contended_counter(MutexKind::Recursive);
}

#[test]
fn test_recursive_mutex_nested_under_contention() {
    let mutex = Arc::new(Mutex::new(MutexKind::Recursive));
    let counter = Arc::new(AtomicU64::new(0));

    let threads = {
        let mutex = Arc::clone(&mutex);
        let counter = Arc::clone(&counter);
        support::spawn_contenders(4, move || {
            for _ in 0..ITERATIONS {
                mutex.lock().unwrap();
                mutex.lock().unwrap();
                let value = counter.load(Ordering::Relaxed);
                counter.store(value + 1, Ordering::Relaxed);
                mutex.unlock().unwrap();
                // Still held here: the inner release must not open the
                // critical section to other contexts.
                let value = counter.load(Ordering::Relaxed);
                counter.store(value + 1, Ordering::Relaxed);
                mutex.unlock().unwrap();
            }
            0
        })
    };
    support::join_all(threads);

    assert_eq!(counter.load(Ordering::Relaxed), 4 * ITERATIONS * 2);
}
