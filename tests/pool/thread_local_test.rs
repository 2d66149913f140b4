/*!
 * Thread-Local Pool Tests
 * Per-thread confinement and pool-backed rendering
 */

use instrumented_pool::{render_debug, render_display, try_with_thread_pool, with_thread_pool};
use pretty_assertions::assert_eq;
use std::thread;

#[test]
fn test_threads_never_share_pools() {
    let handles: Vec<_> = (1..=4)
        .map(|n| {
            thread::spawn(move || {
                with_thread_pool(|pool| {
                    for _ in 0..n {
                        pool.allocate::<u64>(1).unwrap();
                    }
                    pool.active_allocation_count()
                })
            })
        })
        .collect();

    let counts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![1, 2, 3, 4]);
}

#[test]
fn test_rendered_values_surface_as_leaks() {
    thread::spawn(|| {
        with_thread_pool(|pool| {
            let answer = render_display(pool, &42).unwrap();
            let list = render_debug(pool, &["a", "b"]).unwrap();

            assert_eq!(answer.to_owned_string().as_deref(), Some("42"));
            assert_eq!(list.to_owned_string().as_deref(), Some("[\"a\", \"b\"]"));

            // Never released by the renderer itself
            assert_eq!(pool.active_allocation_count(), 2);
            let report = pool.leak_report();
            assert!(report.iter().any(|e| e.is_for(answer.as_ptr())));
            assert!(report.iter().any(|e| e.is_for(list.as_ptr())));

            answer.release();
            list.release();
            assert!(!pool.has_memory_leaks());
        })
    })
    .join()
    .unwrap();
}

#[test]
fn test_reset_between_use_cycles() {
    thread::spawn(|| {
        for cycle in 0..3 {
            with_thread_pool(|pool| {
                assert!(!pool.has_memory_leaks(), "cycle {} started dirty", cycle);
                render_display(pool, &cycle).unwrap();
                pool.allocate::<u32>(4).unwrap();
                assert_eq!(pool.active_allocation_count(), 2);
                pool.reset();
            });
        }
    })
    .join()
    .unwrap();
}

#[test]
fn test_try_with_thread_pool() {
    let count = thread::spawn(|| try_with_thread_pool(|pool| pool.active_allocation_count()))
        .join()
        .unwrap();
    assert_eq!(count, Some(0));
}
