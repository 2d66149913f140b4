/*!
 * Pool Property Tests
 * Live-count bookkeeping under arbitrary allocate/release sequences
 */

use instrumented_pool::{PoolConfig, TrackedPool};
use proptest::prelude::*;
use std::ptr::NonNull;

#[derive(Debug, Clone)]
enum Op {
    Allocate { size: usize, align_shift: u32 },
    Release(usize),
    ReleaseTwice(usize),
    ReleaseForeign,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..256, 0u32..7)
            .prop_map(|(size, align_shift)| Op::Allocate { size, align_shift }),
        2 => any::<usize>().prop_map(Op::Release),
        1 => any::<usize>().prop_map(Op::ReleaseTwice),
        1 => Just(Op::ReleaseForeign),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_live_count_matches_model(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let pool = TrackedPool::with_config(PoolConfig::testing());
        let mut live: Vec<NonNull<u8>> = Vec::new();
        let mut issued = 0usize;
        let foreign = 0u64;

        for op in ops {
            match op {
                Op::Allocate { size, align_shift } => {
                    let alignment = 1usize << align_shift;
                    let ptr = pool.allocate_bytes(size, alignment, 1).unwrap();
                    prop_assert_eq!(ptr.as_ptr() as usize % alignment, 0);
                    live.push(ptr);
                    issued += 1;
                }
                Op::Release(i) if !live.is_empty() => {
                    let ptr = live.swap_remove(i % live.len());
                    prop_assert!(pool.deallocate(ptr.as_ptr()));
                }
                Op::ReleaseTwice(i) if !live.is_empty() => {
                    let ptr = live.swap_remove(i % live.len());
                    prop_assert!(pool.deallocate(ptr.as_ptr()));
                    prop_assert!(!pool.deallocate(ptr.as_ptr()));
                }
                Op::ReleaseForeign => {
                    prop_assert!(!pool.deallocate(&foreign as *const u64));
                }
                _ => {}
            }

            prop_assert_eq!(pool.active_allocation_count(), live.len());
            prop_assert_eq!(pool.has_memory_leaks(), !live.is_empty());
        }

        prop_assert_eq!(pool.allocation_count(), issued);
        prop_assert_eq!(pool.leak_report().len(), live.len());

        pool.reset();
        prop_assert_eq!(pool.active_allocation_count(), 0);
        prop_assert!(pool.leak_report().is_empty());
    }
}
