/*!
 * Monotonic Arena
 * Bump allocation over `bumpalo` with release-and-reallocate rewind
 */

use crate::core::types::Size;
use bumpalo::Bump;
use std::alloc::Layout;
use std::ptr::NonNull;
use tracing::debug;

/// Growable bump arena owned by one pool
///
/// Freed blocks are never reused; memory comes back only through [`Arena::rewind`].
pub(super) struct Arena {
    bump: Bump,
    initial_capacity: Size,
    limit: Option<Size>,
}

// SAFETY: `Bump` is `!Sync` because `&Bump` can allocate through interior
// mutability. `Arena` only allocates through `&mut self`, and the sole `&self`
// method reads chunk metadata. The pool mutates the arena under its write
// lock, so shared references never coexist with a mutation.
unsafe impl Sync for Arena {}

impl Arena {
    pub fn new(initial_capacity: Size, limit: Option<Size>) -> Self {
        Self {
            bump: fresh_bump(initial_capacity, limit),
            initial_capacity,
            limit,
        }
    }

    /// Carve `layout` from the current chunk, growing the arena if needed
    ///
    /// Returns `None` when a new chunk cannot be obtained. The arena is left
    /// untouched in that case.
    #[inline]
    pub fn try_alloc(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        self.bump.try_alloc_layout(layout).ok()
    }

    /// Release all backing storage and start over with a fresh first chunk
    pub fn rewind(&mut self) {
        // Drop the old chunks before asking for a new one
        self.bump = Bump::new();
        self.bump = fresh_bump(self.initial_capacity, self.limit);
    }

    /// Bytes of backing storage currently held
    #[inline]
    pub fn allocated_bytes(&self) -> Size {
        self.bump.allocated_bytes()
    }
}

fn fresh_bump(initial_capacity: Size, limit: Option<Size>) -> Bump {
    let bump = Bump::try_with_capacity(initial_capacity).unwrap_or_else(|_| {
        debug!(
            initial_capacity,
            "Initial arena chunk unavailable, growing lazily instead"
        );
        Bump::new()
    });
    bump.set_allocation_limit(limit);
    bump
}
