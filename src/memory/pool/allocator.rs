/*!
 * Pool Allocator Implementation
 * Allocation and deallocation logic
 */

use super::{LiveIndex, TrackedPool};
use crate::core::limits::MIN_ALLOCATION_SIZE;
use crate::core::types::{address_of, Address, Generation, Size};
use crate::memory::types::{AllocationRecord, PoolError, PoolResult};
use std::alloc::Layout;
use std::mem;
use std::ptr::{self, NonNull};
use tracing::{debug, trace};

impl TrackedPool {
    /// Allocate uninitialized storage for `count` values of `T`
    ///
    /// The pointer stays valid until [`TrackedPool::reset`] or until the pool
    /// is dropped. Releasing it with [`TrackedPool::deallocate`] only updates
    /// bookkeeping; the bytes are not reused.
    ///
    /// # Example
    ///
    /// ```
    /// use instrumented_pool::TrackedPool;
    ///
    /// let pool = TrackedPool::new();
    /// let ptr = pool.allocate::<u64>(4).unwrap();
    /// unsafe { ptr.as_ptr().write(7) };
    /// assert!(pool.has_memory_leaks());
    ///
    /// pool.deallocate(ptr.as_ptr());
    /// assert!(!pool.has_memory_leaks());
    /// ```
    #[inline]
    pub fn allocate<T>(&self, count: usize) -> PoolResult<NonNull<T>> {
        self.allocate_bytes(mem::size_of::<T>(), mem::align_of::<T>(), count)
            .map(NonNull::cast)
    }

    /// Allocate `element_size * count` uninitialized bytes aligned to `alignment`
    ///
    /// Zero-byte requests are rounded up to one byte so every live
    /// allocation has its own address.
    pub fn allocate_bytes(
        &self,
        element_size: Size,
        alignment: Size,
        count: usize,
    ) -> PoolResult<NonNull<u8>> {
        let layout = request_layout(element_size, alignment, count)?;
        self.carve(layout, |_| {}).map(|(ptr, _)| ptr)
    }

    /// Allocate a tracked copy of `bytes`, written before the lock is released
    pub(crate) fn allocate_copy(&self, bytes: &[u8]) -> PoolResult<(NonNull<u8>, Generation)> {
        let layout = request_layout(1, 1, bytes.len())?;
        self.carve(layout, |dst| {
            // SAFETY: `dst` was just carved with room for `bytes.len()` bytes and
            // cannot overlap a borrowed slice.
            unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), dst.as_ptr(), bytes.len()) }
        })
    }

    /// Release a tracked allocation
    ///
    /// Any pointer is accepted. Never-issued, already released and foreign
    /// pointers are ignored, so releasing twice is harmless. The pointer is
    /// never dereferenced.
    ///
    /// Returns `true` if the pointer was live.
    pub fn deallocate<T: ?Sized>(&self, ptr: *const T) -> bool {
        let mut state = self.state.write();
        release_tracked(&mut state.live, address_of(ptr))
    }

    /// Release `ptr` only if no reset happened since `generation`
    ///
    /// After a reset the arena hands out the same addresses again, so a stale
    /// pointer may name an unrelated live allocation.
    pub(crate) fn deallocate_if_current<T: ?Sized>(
        &self,
        ptr: *const T,
        generation: Generation,
    ) -> bool {
        let mut state = self.state.write();
        if state.generation != generation {
            trace!(
                address = address_of(ptr),
                generation,
                current = state.generation,
                "Ignoring release from an earlier generation"
            );
            return false;
        }
        release_tracked(&mut state.live, address_of(ptr))
    }

    /// Carve `layout` from the arena and register it, all under the write lock
    fn carve<F>(&self, layout: Layout, init: F) -> PoolResult<(NonNull<u8>, Generation)>
    where
        F: FnOnce(NonNull<u8>),
    {
        let size = layout.size();
        let mut state = self.state.write();

        let ptr = match state.arena.try_alloc(layout) {
            Some(ptr) => ptr,
            None => {
                debug!(
                    requested = size,
                    alignment = layout.align(),
                    arena_bytes = state.arena.allocated_bytes(),
                    "Arena exhausted"
                );
                return Err(PoolError::OutOfMemory {
                    requested: size,
                    alignment: layout.align(),
                });
            }
        };

        init(ptr);

        let address = ptr.as_ptr() as Address;
        state.live.insert(address, AllocationRecord::new(size));
        self.allocation_count.increment();
        self.total_allocated.add(size);
        let generation = state.generation;
        drop(state);

        trace!(address, size, alignment = layout.align(), "Allocated");
        Ok((ptr, generation))
    }
}

fn release_tracked(live: &mut LiveIndex, address: Address) -> bool {
    match live.remove(&address) {
        Some(mut record) => {
            record.release();
            trace!(address, size = record.size, "Released allocation");
            true
        }
        None => {
            trace!(address, "Ignoring release of untracked address");
            false
        }
    }
}

/// Validate a request and round it to the extent actually carved
fn request_layout(element_size: Size, alignment: Size, count: usize) -> PoolResult<Layout> {
    if !alignment.is_power_of_two() {
        return Err(PoolError::InvalidAlignment(alignment));
    }

    let size = element_size
        .checked_mul(count)
        .ok_or(PoolError::SizeOverflow {
            element_size,
            count,
        })?
        .max(MIN_ALLOCATION_SIZE);

    Layout::from_size_align(size, alignment)
        .map(|layout| layout.pad_to_align())
        .map_err(|_| PoolError::InvalidLayout { size, alignment })
}
