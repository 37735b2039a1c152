//! Modulo-capacity index arithmetic shared by every buffer in the crate.
//!
//! All helpers take a physical index that is already in `0..capacity` and
//! return another index in the same range. None of them divide, so they are
//! safe to call on the hot path of a push or pop.

/// Advances `index` by one slot, wrapping from `capacity - 1` to `0`.
#[inline(always)]
pub const fn wrap_inc(index: usize, capacity: usize) -> usize {
    debug_assert!(index < capacity);
    if index + 1 == capacity { 0 } else { index + 1 }
}

/// Moves `index` back by one slot, wrapping from `0` to `capacity - 1`.
#[inline(always)]
pub const fn wrap_dec(index: usize, capacity: usize) -> usize {
    debug_assert!(index < capacity);
    if index == 0 { capacity - 1 } else { index - 1 }
}

/// Maps a logical offset from `head` to its physical slot.
///
/// `offset` must be below `capacity`, which holds for every logical index
/// of an occupied slot.
#[inline(always)]
pub const fn wrap_add(head: usize, offset: usize, capacity: usize) -> usize {
    debug_assert!(head < capacity && offset < capacity);
    let room = capacity - head;
    if offset < room { head + offset } else { offset - room }
}
