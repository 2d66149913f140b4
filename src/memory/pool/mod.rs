/*!
 * Tracked Pool
 *
 * Monotonic arena allocator that records every live allocation for leak auditing.
 *
 * ## Locking
 *
 * - `allocate`, `deallocate` and `reset` take the exclusive lock
 * - `active_allocation_count`, `has_memory_leaks`, `leak_report` and `stats`
 *   take the shared lock
 * - Statistics counters are relaxed atomics outside the lock
 *
 * The pool never calls caller code while holding its lock and never locks
 * recursively.
 *
 * ## Ownership
 *
 * Pools are meant to be thread-confined (see [`crate::memory::with_thread_pool`]),
 * but a single instance shared through `Arc` is safe under contention.
 *
 * Released blocks are never reused. Backing memory is returned only by
 * [`TrackedPool::reset`], which also invalidates every pointer handed out
 * before it. No destructors run for values stored in the pool.
 */

mod allocator;
mod arena;
mod audit;

use super::config::PoolConfig;
use super::traits::{LeakAuditor, PoolAllocator};
use super::types::{AllocationRecord, LeakEntry, PoolResult};
use crate::core::types::{Address, Generation, Size};
use crate::core::AtomicCounter;
use ahash::RandomState;
use arena::Arena;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::ptr::NonNull;
use tracing::debug;

/// Live allocations keyed by address
type LiveIndex = HashMap<Address, AllocationRecord, RandomState>;

/// State guarded by the pool lock
struct PoolState {
    arena: Arena,
    live: LiveIndex,
    generation: Generation,
}

/// Instrumented bump pool
///
/// # Performance
/// - Cache-line aligned to prevent false sharing of atomic counters
#[repr(C, align(64))]
pub struct TrackedPool {
    state: RwLock<PoolState>,
    allocation_count: AtomicCounter<usize>,
    total_allocated: AtomicCounter<usize>,
    config: PoolConfig,
}

impl TrackedPool {
    /// Pool with the default 1MB initial arena
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Pool with a custom initial arena capacity
    pub fn with_capacity(initial_capacity: Size) -> Self {
        Self::with_config(PoolConfig::default().with_initial_capacity(initial_capacity))
    }

    pub fn with_config(config: PoolConfig) -> Self {
        debug!(
            initial_capacity = config.initial_capacity,
            allocation_limit = ?config.allocation_limit,
            "Tracked pool initialized"
        );
        Self {
            state: RwLock::new(PoolState {
                arena: Arena::new(config.initial_capacity, config.allocation_limit),
                live: HashMap::with_hasher(RandomState::new()),
                generation: 0,
            }),
            allocation_count: AtomicCounter::new(),
            total_allocated: AtomicCounter::new(),
            config,
        }
    }

    /// Configuration this pool was built with
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl PoolAllocator for TrackedPool {
    fn allocate_bytes(
        &self,
        element_size: Size,
        alignment: Size,
        count: usize,
    ) -> PoolResult<NonNull<u8>> {
        TrackedPool::allocate_bytes(self, element_size, alignment, count)
    }

    fn deallocate(&self, ptr: *const u8) -> bool {
        TrackedPool::deallocate(self, ptr)
    }

    fn reset(&self) {
        TrackedPool::reset(self)
    }
}

impl LeakAuditor for TrackedPool {
    fn active_allocation_count(&self) -> usize {
        TrackedPool::active_allocation_count(self)
    }

    fn leak_report(&self) -> Vec<LeakEntry> {
        TrackedPool::leak_report(self)
    }
}

impl Default for TrackedPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TrackedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedPool")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
