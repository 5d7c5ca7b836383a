//! Fallible buffer allocation.

use slime_core::ConfigError;

/// Allocate a `len`-element buffer, filling each slot with `init()`.
///
/// Uses `try_reserve_exact` so an oversized request surfaces as
/// [`ConfigError::AllocationFailed`] instead of aborting the process.
pub(crate) fn try_alloc_with<T>(
    len: usize,
    what: &'static str,
    mut init: impl FnMut() -> T,
) -> Result<Vec<T>, ConfigError> {
    let bytes = len.saturating_mul(std::mem::size_of::<T>());
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ConfigError::AllocationFailed { what, bytes })?;
    buf.extend((0..len).map(|_| init()));
    Ok(buf)
}
