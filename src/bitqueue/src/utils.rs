//! Miscellaneous utilities for working with bit fields.

/// Sign-extends an `nbits` wide value to [`i64`].
///
/// `nbits` must be in the range `1..=64`.
#[inline]
pub fn sign_extend(value: u64, nbits: u32) -> i64 {
    debug_assert!((1..=u64::BITS).contains(&nbits));

    let shift = u64::BITS - nbits;
    ((value << shift) as i64) >> shift
}
