//! Exactly-once initialization under racing callers

use crate::support;
use portable_threads::OnceFlag;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn race_callers(contenders: usize) {
    let flag = Arc::new(OnceFlag::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let completions_observed = Arc::new(AtomicUsize::new(0));

    let threads = {
        let flag = Arc::clone(&flag);
        let calls = Arc::clone(&calls);
        let completions = Arc::clone(&completions_observed);
        support::spawn_contenders(contenders, move || {
            let calls = Arc::clone(&calls);
            flag.call_once(move || {
                // Linger so latecomers genuinely observe the Running state.
                std::thread::sleep(std::time::Duration::from_millis(5));
                calls.fetch_add(1, Ordering::SeqCst);
            });
            // Returning from call_once means the one execution finished.
            if flag.is_completed() {
                completions.fetch_add(1, Ordering::SeqCst);
            }
            0
        })
    };
    support::join_all(threads);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(completions_observed.load(Ordering::SeqCst), contenders);
}

#[test]
fn test_single_caller() {
    race_callers(1);
}

#[test]
fn test_two_racing_callers() {
    race_callers(2);
}

#[test]
fn test_hundred_racing_callers() {
    race_callers(100);
}

#[test]
fn test_independent_flags_do_not_interfere() {
    let flags: Vec<_> = (0..8).map(|_| Arc::new(OnceFlag::new())).collect();
    let calls = Arc::new(AtomicUsize::new(0));

    let threads = {
        let flags = flags.clone();
        let calls = Arc::clone(&calls);
        support::spawn_contenders(16, move || {
            for flag in &flags {
                let calls = Arc::clone(&calls);
                flag.call_once(move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                });
            }
            0
        })
    };
    support::join_all(threads);

    assert_eq!(calls.load(Ordering::SeqCst), flags.len());
}
