/*!
 * Memory Module
 * Tracked pool allocation and leak auditing
 */

pub mod config;
pub mod local;
pub mod pool;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use config::PoolConfig;
pub use local::{try_with_thread_pool, with_thread_pool};
pub use pool::TrackedPool;
pub use traits::*;
pub use types::{LeakEntry, PoolError, PoolResult, PoolStats};
