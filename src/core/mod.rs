/*!
 * Core Module
 * Fundamental pool types, limits and statistics primitives
 */

pub mod counter;
pub mod limits;
pub mod types;

// Re-export for convenience
pub use counter::{AtomicCounter, CounterValue};
pub use types::*;
