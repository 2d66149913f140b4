/*!
 * Thread-Local Pool
 *
 * One pool per OS thread, created lazily on first use from
 * [`PoolConfig::from_env`] and dropped when the thread exits.
 *
 * [`with_thread_pool`] is the only way to reach it. Nothing allocated here can
 * be observed from another thread's pool, and the pool's memory is freed at
 * thread exit whether or not allocations were released.
 */

use super::config::PoolConfig;
use super::pool::TrackedPool;

thread_local! {
    static THREAD_POOL: TrackedPool = TrackedPool::with_config(PoolConfig::from_env());
}

/// Execute closure with this thread's pool
///
/// # Panics
///
/// Panics if called while thread-local storage is being torn down; use
/// [`try_with_thread_pool`] from destructors.
///
/// # Example
///
/// ```
/// use instrumented_pool::memory::with_thread_pool;
///
/// let leaks = with_thread_pool(|pool| {
///     let _scratch = pool.allocate::<u8>(64).unwrap();
///     pool.active_allocation_count()
/// });
/// assert!(leaks >= 1);
/// ```
#[inline]
pub fn with_thread_pool<F, R>(f: F) -> R
where
    F: FnOnce(&TrackedPool) -> R,
{
    THREAD_POOL.with(|pool| f(pool))
}

/// Like [`with_thread_pool`], but `None` once the thread's pool is gone
#[inline]
pub fn try_with_thread_pool<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&TrackedPool) -> R,
{
    THREAD_POOL.try_with(|pool| f(pool)).ok()
}
