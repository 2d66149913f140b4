/*!
 * Leak Report Tests
 * Report contents, ages and interaction with release and reset
 */

use instrumented_pool::{LeakAuditor, PoolAllocator, TrackedPool};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

#[test]
fn test_one_entry_per_live_allocation() {
    let pool = TrackedPool::new();
    let a = pool.allocate::<u8>(10).unwrap();
    let b = pool.allocate::<u64>(1).unwrap();
    let c = pool.allocate::<u32>(3).unwrap();
    pool.deallocate(b.as_ptr());

    let report = pool.leak_report();
    assert_eq!(report.len(), 2);

    let by_address: HashMap<_, _> = report.iter().map(|e| (e.address, e.size)).collect();
    assert_eq!(by_address.get(&(a.as_ptr() as usize)), Some(&10));
    assert_eq!(by_address.get(&(c.as_ptr() as usize)), Some(&12));
    assert!(!report.iter().any(|e| e.is_for(b.as_ptr())));
}

#[test]
fn test_ages_grow_between_queries() {
    let pool = TrackedPool::new();
    let ptr = pool.allocate::<u64>(1).unwrap();

    let first = pool.leak_report();
    thread::sleep(Duration::from_millis(20));
    let second = pool.leak_report();

    let age_of = |report: &[instrumented_pool::LeakEntry]| {
        report
            .iter()
            .find(|e| e.is_for(ptr.as_ptr()))
            .map(|e| e.age)
            .unwrap()
    };

    let (early, late) = (age_of(&first[..]), age_of(&second[..]));
    assert!(early >= Duration::ZERO);
    assert!(late > early);
    assert!(late - early >= Duration::from_millis(20));
}

#[test]
fn test_has_leaks_iff_count_positive() {
    let pool = TrackedPool::new();
    assert_eq!(pool.has_memory_leaks(), pool.active_allocation_count() > 0);

    let ptrs: Vec<_> = (0..5).map(|_| pool.allocate::<u16>(1).unwrap()).collect();
    for ptr in &ptrs {
        assert_eq!(pool.has_memory_leaks(), pool.active_allocation_count() > 0);
        pool.deallocate(ptr.as_ptr());
    }

    assert_eq!(pool.active_allocation_count(), 0);
    assert!(!pool.has_memory_leaks());
}

#[test]
fn test_report_empty_after_reset() {
    let pool = TrackedPool::new();
    for _ in 0..10 {
        pool.allocate::<u64>(1).unwrap();
    }
    assert_eq!(pool.leak_report().len(), 10);

    pool.reset();
    assert!(pool.leak_report().is_empty());
}

#[test]
fn test_report_serializes() {
    let pool = TrackedPool::new();
    pool.allocate::<u32>(1).unwrap();

    let json = serde_json::to_string(&pool.leak_report()).unwrap_or_default();
    assert!(json.contains("\"address\""));
    assert!(json.contains("\"age\""));
}

/// Audits through the trait seams only
fn audit(pool: &(impl PoolAllocator + LeakAuditor)) -> (usize, bool) {
    let ptr = pool.allocate_bytes(8, 8, 2).unwrap();
    let during = pool.active_allocation_count();
    pool.deallocate(ptr.as_ptr());
    (during, pool.has_memory_leaks())
}

#[test]
fn test_trait_seams() {
    let pool = TrackedPool::new();
    assert_eq!(audit(&pool), (1, false));

    pool.allocate::<u8>(1).unwrap();
    assert!(LeakAuditor::has_memory_leaks(&pool));
    assert_eq!(LeakAuditor::leak_report(&pool).len(), 1);

    PoolAllocator::reset(&pool);
    assert!(!LeakAuditor::has_memory_leaks(&pool));
}
