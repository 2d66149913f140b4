/*!
 * Pool Limits and Constants
 *
 * Centralized location for pool-wide defaults and environment keys.
 */

// =============================================================================
// ARENA SIZING
// =============================================================================

/// Default initial arena capacity (1MB)
/// Undersizing only triggers more frequent arena growth
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024 * 1024;

/// Small arena capacity (64KB)
/// Matches the request-scoped arenas used for short-lived scratch work
pub const SMALL_INITIAL_CAPACITY: usize = 64 * 1024;

/// Testing arena capacity (4KB)
/// [PERF] Forces growth early so tests exercise chunk allocation
pub const TESTING_INITIAL_CAPACITY: usize = 4 * 1024;

/// Smallest extent ever carved for a single allocation
/// Zero-byte requests are rounded up so live addresses stay distinct
pub const MIN_ALLOCATION_SIZE: usize = 1;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Initial arena capacity in bytes
pub const ENV_INITIAL_CAPACITY: &str = "POOL_INITIAL_CAPACITY";

/// Upper bound on total arena bytes
pub const ENV_ALLOCATION_LIMIT: &str = "POOL_ALLOCATION_LIMIT";

/// Switches tracing output to JSON when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "POOL_TRACE_JSON";
