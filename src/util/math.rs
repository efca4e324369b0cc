//! Small numeric helpers shared by padding and peak decoding.

/// Returns `ceil(diff / 2)`, the leading share of an odd padding amount.
#[inline]
pub(crate) fn ceil_half(diff: usize) -> usize {
    diff / 2 + diff % 2
}

/// Maps a circular index in `[0, len)` to a signed displacement.
///
/// Indices past the half-length wrap to negative values, so index `len - 1`
/// becomes `-1`.
pub(crate) fn wrap_signed(index: usize, len: usize) -> isize {
    if len == 0 {
        return 0;
    }
    let index = index % len;
    if index > len / 2 {
        index as isize - len as isize
    } else {
        index as isize
    }
}
