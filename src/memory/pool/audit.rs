/*!
 * Pool Auditing
 * Live-allocation queries, leak reports, statistics and reset
 */

use super::TrackedPool;
use crate::core::types::{address_of, Generation};
use crate::memory::types::{LeakEntry, PoolStats};
use std::time::Instant;
use tracing::debug;

impl TrackedPool {
    /// Number of allocations not yet released
    pub fn active_allocation_count(&self) -> usize {
        self.state.read().live.len()
    }

    /// Whether any allocation is still outstanding
    #[inline]
    pub fn has_memory_leaks(&self) -> bool {
        self.active_allocation_count() > 0
    }

    /// Whether `ptr` is a live allocation of this pool
    pub fn is_live<T: ?Sized>(&self, ptr: *const T) -> bool {
        self.state
            .read()
            .live
            .get(&address_of(ptr))
            .map_or(false, |record| record.is_allocated())
    }

    /// Every live allocation with its size and age
    ///
    /// Order is unspecified and may differ between calls.
    pub fn leak_report(&self) -> Vec<LeakEntry> {
        let state = self.state.read();
        let now = Instant::now();

        state
            .live
            .iter()
            .filter(|(_, record)| record.is_allocated())
            .map(|(&address, record)| LeakEntry {
                address,
                size: record.size,
                age: record.age_at(now),
            })
            .collect()
    }

    /// Allocate calls since creation or last reset
    #[inline]
    pub fn allocation_count(&self) -> usize {
        self.allocation_count.get()
    }

    /// Bytes handed out since creation or last reset
    #[inline]
    pub fn total_allocated(&self) -> usize {
        self.total_allocated.get()
    }

    /// Snapshot of pool statistics
    pub fn stats(&self) -> PoolStats {
        let state = self.state.read();

        PoolStats {
            active_allocations: state.live.len(),
            allocation_count: self.allocation_count.get(),
            total_allocated: self.total_allocated.get(),
            live_bytes: state.live.values().map(|record| record.size).sum(),
            arena_bytes: state.arena.allocated_bytes(),
        }
    }

    /// Rewind the arena and forget every allocation
    ///
    /// Backing storage is released and a fresh first chunk is allocated.
    /// Every pointer handed out before the reset is invalidated. Values
    /// stored in the pool are not dropped.
    pub fn reset(&self) {
        let mut state = self.state.write();
        let forgotten = state.live.len();

        state.arena.rewind();
        state.live.clear();
        state.generation = state.generation.wrapping_add(1);
        self.allocation_count.reset();
        self.total_allocated.reset();
        let generation = state.generation;
        drop(state);

        debug!(forgotten, generation, "Pool reset");
    }

    /// Arena generation, bumped by every reset
    pub(crate) fn generation(&self) -> Generation {
        self.state.read().generation
    }

    /// Run `read` under the shared lock if no reset happened since `generation`
    ///
    /// `read` must not call back into the pool.
    pub(crate) fn read_if_current<R>(
        &self,
        generation: Generation,
        read: impl FnOnce() -> R,
    ) -> Option<R> {
        let state = self.state.read();
        if state.generation != generation {
            return None;
        }
        Some(read())
    }
}
