/*!
 * Memory Types
 * Errors, bookkeeping records and reports for the tracked pool
 */

use crate::core::types::{Address, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Pool operation result
pub type PoolResult<T> = Result<T, PoolError>;

/// Pool errors
///
/// Releasing an unknown pointer is deliberately absent: it is a no-op, not a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum PoolError {
    #[error("Out of memory: arena could not grow to fit {requested} bytes aligned to {alignment}")]
    #[diagnostic(
        code(pool::out_of_memory),
        help("Raise the allocation limit or reset the pool between use cycles.")
    )]
    OutOfMemory { requested: Size, alignment: Size },

    #[error("Allocation size overflow: {count} elements of {element_size} bytes")]
    #[diagnostic(code(pool::size_overflow))]
    SizeOverflow { element_size: Size, count: usize },

    #[error("Invalid alignment {0}: must be a power of two")]
    #[diagnostic(code(pool::invalid_alignment))]
    InvalidAlignment(Size),

    #[error("Invalid layout: {size} bytes aligned to {alignment}")]
    #[diagnostic(
        code(pool::invalid_layout),
        help("The size rounded up to the alignment must not exceed isize::MAX.")
    )]
    InvalidLayout { size: Size, alignment: Size },

    #[error("Invalid pool configuration: {0}")]
    #[diagnostic(code(pool::invalid_config))]
    InvalidConfig(String),

    #[error("Value formatting failed")]
    #[diagnostic(
        code(pool::format_failed),
        help("A Display or Debug implementation returned an error.")
    )]
    FormatFailed,
}

/// Bookkeeping for one tracked allocation
///
/// Owned exclusively by the pool and never handed to callers.
#[derive(Debug, Clone)]
pub(crate) struct AllocationRecord {
    pub size: Size,
    pub allocated: bool,
    pub allocated_at: Instant,
}

impl AllocationRecord {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            allocated: true,
            allocated_at: Instant::now(),
        }
    }

    pub fn release(&mut self) {
        self.allocated = false;
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.allocated_at)
    }
}

/// One live-but-unreleased allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakEntry {
    pub address: Address,
    pub size: Size,
    pub age: Duration,
}

impl LeakEntry {
    /// Whether this entry describes `ptr`
    #[inline]
    pub fn is_for<T: ?Sized>(&self, ptr: *const T) -> bool {
        self.address == crate::core::types::address_of(ptr)
    }
}

/// Point-in-time pool statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Allocations not yet released
    pub active_allocations: usize,
    /// Allocate calls since creation or last reset
    pub allocation_count: usize,
    /// Bytes handed out since creation or last reset
    pub total_allocated: Size,
    /// Bytes held by live allocations
    pub live_bytes: Size,
    /// Backing bytes held by the arena
    pub arena_bytes: Size,
}

impl PoolStats {
    pub fn has_leaks(&self) -> bool {
        self.active_allocations > 0
    }
}
