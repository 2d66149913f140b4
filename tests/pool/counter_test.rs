/*!
 * Atomic Counter Tests
 * Concurrent readers and writers on the statistics counter
 */

use instrumented_pool::AtomicCounter;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_read_write() {
    let counter = Arc::new(AtomicCounter::<i32>::new());
    let stop = Arc::new(AtomicBool::new(false));
    let reads = Arc::new(AtomicUsize::new(0));

    let writer = {
        let counter = Arc::clone(&counter);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                counter.increment();
                thread::sleep(Duration::from_micros(10));
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let counter = Arc::clone(&counter);
            let stop = Arc::clone(&stop);
            let reads = Arc::clone(&reads);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let _ = counter.get();
                    reads.fetch_add(1, Ordering::Relaxed);
                    thread::sleep(Duration::from_micros(5));
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(100));
    stop.store(true, Ordering::Relaxed);

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert!(counter.get() > 0);
    assert!(reads.load(Ordering::Relaxed) > 0);
}

#[test]
fn test_mixed_sign_adds_across_threads() {
    let counter = Arc::new(AtomicCounter::<i64>::new());

    let handles: Vec<_> = (0..8i64)
        .map(|t| {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                let delta = if t % 2 == 0 { 7 } else { -3 };
                for _ in 0..1000 {
                    counter.add(delta);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(counter.get(), 4 * 1000 * 7 - 4 * 1000 * 3);
}

#[test]
fn test_reset_is_visible() {
    let counter = AtomicCounter::<usize>::new();
    counter.add(usize::MAX);
    counter.reset();
    counter.increment();
    assert_eq!(counter.get(), 1);
}
