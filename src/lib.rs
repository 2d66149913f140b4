/*!
 * Instrumented Pool Library
 *
 * Thread-safe bump arena that tracks every live allocation for leak
 * detection and reporting.
 */

pub mod core;
pub mod format;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use crate::core::AtomicCounter;
pub use format::{render_debug, render_display, PooledStr};
pub use memory::{
    try_with_thread_pool, with_thread_pool, LeakAuditor, LeakEntry, PoolAllocator, PoolConfig,
    PoolError, PoolResult, PoolStats, TrackedPool,
};
pub use monitoring::init_tracing;
