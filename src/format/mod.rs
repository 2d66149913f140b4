/*!
 * Pool-Backed Value Formatting
 *
 * Renders values into text that lives in a [`TrackedPool`].
 *
 * Rendered strings are not released automatically. They stay in the pool's
 * live set, and show up in its leak report, until [`PooledStr::release`] is
 * called or the pool is reset.
 */

use crate::core::types::Generation;
use crate::memory::{PoolError, PoolResult, TrackedPool};
use smartstring::{LazyCompact, SmartString};
use std::fmt::{self, Write};
use std::ptr::NonNull;

/// UTF-8 text carved from a pool
pub struct PooledStr<'pool> {
    pool: &'pool TrackedPool,
    ptr: NonNull<u8>,
    len: usize,
    generation: Generation,
}

impl<'pool> PooledStr<'pool> {
    /// Length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address of the text inside the pool
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Whether the text is still readable, i.e. the pool has not been reset
    pub fn is_valid(&self) -> bool {
        self.pool.generation() == self.generation
    }

    /// Copy the text out of the pool
    ///
    /// Returns `None` if the pool was reset after the text was rendered.
    pub fn to_owned_string(&self) -> Option<String> {
        let (ptr, len) = (self.ptr, self.len);
        self.pool.read_if_current(self.generation, || {
            // SAFETY: the generation is unchanged, so the arena has not been
            // rewound and the `len` bytes copied in at render time are intact.
            // They came from a `str`, so they are valid UTF-8.
            let bytes = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), len) };
            unsafe { std::str::from_utf8_unchecked(bytes) }.to_owned()
        })
    }

    /// Return the text's allocation to the pool's bookkeeping
    ///
    /// Returns `false` without touching the pool if it was reset after the
    /// text was rendered.
    pub fn release(self) -> bool {
        self.pool.deallocate_if_current(self.ptr.as_ptr(), self.generation)
    }
}

impl fmt::Debug for PooledStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledStr")
            .field("address", &self.ptr)
            .field("len", &self.len)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Render `value` with its `Display` implementation
pub fn render_display<'pool, T>(
    pool: &'pool TrackedPool,
    value: &T,
) -> PoolResult<PooledStr<'pool>>
where
    T: fmt::Display + ?Sized,
{
    render_args(pool, format_args!("{}", value))
}

/// Render `value` with its `Debug` implementation
pub fn render_debug<'pool, T>(
    pool: &'pool TrackedPool,
    value: &T,
) -> PoolResult<PooledStr<'pool>>
where
    T: fmt::Debug + ?Sized,
{
    render_args(pool, format_args!("{:?}", value))
}

/// Render preformatted arguments
///
/// Formatting runs into a scratch buffer first, so no pool lock is held while
/// user `Display`/`Debug` code executes.
pub fn render_args<'pool>(
    pool: &'pool TrackedPool,
    args: fmt::Arguments<'_>,
) -> PoolResult<PooledStr<'pool>> {
    let mut scratch: SmartString<LazyCompact> = SmartString::new();
    scratch
        .write_fmt(args)
        .map_err(|_| PoolError::FormatFailed)?;

    let (ptr, generation) = pool.allocate_copy(scratch.as_bytes())?;
    Ok(PooledStr {
        pool,
        ptr,
        len: scratch.len(),
        generation,
    })
}
