/*!
 * Atomic Counter
 *
 * Lock-free accumulator for allocation statistics.
 *
 * All operations use `Ordering::Relaxed`: the counter is observability-only
 * and must not be used to establish happens-before relationships with other
 * state. Readers may observe a value that is concurrently changing.
 */

use std::fmt;
use std::sync::atomic::{
    AtomicI32, AtomicI64, AtomicIsize, AtomicU32, AtomicU64, AtomicUsize, Ordering,
};

/// Numeric types that can back an [`AtomicCounter`]
pub trait CounterValue: Copy + fmt::Debug + Send + Sync + 'static {
    /// Matching std atomic
    type Atomic: Send + Sync;

    fn new_atomic(value: Self) -> Self::Atomic;
    fn fetch_add(atomic: &Self::Atomic, delta: Self) -> Self;
    fn load(atomic: &Self::Atomic) -> Self;
    fn store(atomic: &Self::Atomic, value: Self);
    fn zero() -> Self;
    fn one() -> Self;
}

macro_rules! impl_counter_value {
    ($($ty:ty => $atomic:ty),* $(,)?) => {
        $(
            impl CounterValue for $ty {
                type Atomic = $atomic;

                #[inline(always)]
                fn new_atomic(value: Self) -> Self::Atomic {
                    <$atomic>::new(value)
                }

                #[inline(always)]
                fn fetch_add(atomic: &Self::Atomic, delta: Self) -> Self {
                    atomic.fetch_add(delta, Ordering::Relaxed)
                }

                #[inline(always)]
                fn load(atomic: &Self::Atomic) -> Self {
                    atomic.load(Ordering::Relaxed)
                }

                #[inline(always)]
                fn store(atomic: &Self::Atomic, value: Self) {
                    atomic.store(value, Ordering::Relaxed);
                }

                #[inline(always)]
                fn zero() -> Self {
                    0
                }

                #[inline(always)]
                fn one() -> Self {
                    1
                }
            }
        )*
    };
}

impl_counter_value! {
    i32 => AtomicI32,
    i64 => AtomicI64,
    isize => AtomicIsize,
    u32 => AtomicU32,
    u64 => AtomicU64,
    usize => AtomicUsize,
}

/// Relaxed atomic accumulator
///
/// # Example
///
/// ```
/// use instrumented_pool::core::AtomicCounter;
///
/// let counter = AtomicCounter::<i64>::new();
/// counter.add(5);
/// counter.add(-2);
/// counter.increment();
/// assert_eq!(counter.get(), 4);
/// ```
pub struct AtomicCounter<T: CounterValue> {
    value: T::Atomic,
}

impl<T: CounterValue> AtomicCounter<T> {
    /// Create counter starting at zero
    #[inline]
    pub fn new() -> Self {
        Self {
            value: T::new_atomic(T::zero()),
        }
    }

    /// Add one
    #[inline]
    pub fn increment(&self) {
        T::fetch_add(&self.value, T::one());
    }

    /// Add `delta`, which may be negative for signed counters
    #[inline]
    pub fn add(&self, delta: T) {
        T::fetch_add(&self.value, delta);
    }

    /// Current value
    #[inline(always)]
    pub fn get(&self) -> T {
        T::load(&self.value)
    }

    /// Store zero
    #[inline]
    pub fn reset(&self) {
        T::store(&self.value, T::zero());
    }
}

impl<T: CounterValue> Default for AtomicCounter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CounterValue> fmt::Debug for AtomicCounter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicCounter").field(&self.get()).finish()
    }
}
