/*!
 * Core Types
 * Common types used across the pool
 */

/// Address type for memory operations
///
/// Pointers are tracked by their numeric address so bookkeeping never
/// dereferences caller-supplied values.
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;

/// Arena generation, bumped on every reset
pub type Generation = u64;

/// Numeric identity of any pointer, sized or not
#[inline(always)]
pub fn address_of<T: ?Sized>(ptr: *const T) -> Address {
    ptr.cast::<u8>() as Address
}
