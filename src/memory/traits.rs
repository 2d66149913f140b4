/*!
 * Memory Traits
 * Pool allocation and leak auditing abstractions
 */

use super::types::*;
use crate::core::types::Size;
use std::ptr::NonNull;

/// Tracked allocator interface
pub trait PoolAllocator: Send + Sync {
    /// Carve `element_size * count` bytes aligned to `alignment`
    fn allocate_bytes(
        &self,
        element_size: Size,
        alignment: Size,
        count: usize,
    ) -> PoolResult<NonNull<u8>>;

    /// Release a tracked address; unknown addresses are ignored
    fn deallocate(&self, ptr: *const u8) -> bool;

    /// Rewind the arena and forget every allocation
    fn reset(&self);
}

/// Leak auditing interface
pub trait LeakAuditor: Send + Sync {
    /// Number of allocations not yet released
    fn active_allocation_count(&self) -> usize;

    /// Every live allocation with its age
    fn leak_report(&self) -> Vec<LeakEntry>;

    /// Whether any allocation is still outstanding
    fn has_memory_leaks(&self) -> bool {
        self.active_allocation_count() > 0
    }
}
