use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;
use core::slice;

use crate::RingError;
use crate::index::{wrap_add, wrap_dec, wrap_inc};

/// Slot array plus the head/tail/size bookkeeping shared by every buffer.
///
/// Occupied slots are `head, head + 1, .., head + len - 1` (mod capacity).
/// Every other slot holds `None`, so a popped value is never retained.
/// Pushes onto a full array overwrite the opposite end; callers that need
/// a different full policy check `is_full` before pushing.
pub(crate) struct Slots<T> {
    buffer: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> Slots<T> {
    pub(crate) fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity < 1 {
            return Err(RingError::InvalidCapacity(capacity));
        }
        let mut vec = Vec::with_capacity(capacity);
        vec.resize_with(capacity, || None);

        Ok(Self {
            buffer: vec.into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Writes at `tail`. When full, `tail == head`, so the write lands on the
    /// logical front, which is returned.
    pub(crate) fn push_back(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        let displaced = self.buffer[self.tail].replace(item);
        self.tail = wrap_inc(self.tail, capacity);

        if self.len == capacity {
            self.head = self.tail;
            displaced
        } else {
            debug_assert!(displaced.is_none());
            self.len += 1;
            None
        }
    }

    /// Writes one slot before `head`. When full that slot is the logical
    /// back, which is returned.
    pub(crate) fn push_front(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        self.head = wrap_dec(self.head, capacity);
        let displaced = self.buffer[self.head].replace(item);

        if self.len == capacity {
            self.tail = self.head;
            displaced
        } else {
            debug_assert!(displaced.is_none());
            self.len += 1;
            None
        }
    }

    pub(crate) fn pop_front(&mut self) -> Result<T, RingError> {
        if self.is_empty() {
            return Err(RingError::EmptyBuffer);
        }
        let item = self.buffer[self.head].take().ok_or(RingError::EmptyBuffer)?;
        self.head = wrap_inc(self.head, self.capacity());
        self.len -= 1;
        Ok(item)
    }

    pub(crate) fn pop_back(&mut self) -> Result<T, RingError> {
        if self.is_empty() {
            return Err(RingError::EmptyBuffer);
        }
        let last = wrap_dec(self.tail, self.capacity());
        let item = self.buffer[last].take().ok_or(RingError::EmptyBuffer)?;
        self.tail = last;
        self.len -= 1;
        Ok(item)
    }

    pub(crate) fn front(&self) -> Result<&T, RingError> {
        if self.is_empty() {
            return Err(RingError::EmptyBuffer);
        }
        self.buffer[self.head].as_ref().ok_or(RingError::EmptyBuffer)
    }

    pub(crate) fn back(&self) -> Result<&T, RingError> {
        if self.is_empty() {
            return Err(RingError::EmptyBuffer);
        }
        let last = wrap_dec(self.tail, self.capacity());
        self.buffer[last].as_ref().ok_or(RingError::EmptyBuffer)
    }

    fn physical(&self, index: usize) -> Result<usize, RingError> {
        if index >= self.len {
            return Err(RingError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(wrap_add(self.head, index, self.capacity()))
    }

    pub(crate) fn get(&self, index: usize) -> Result<&T, RingError> {
        let slot = self.physical(index)?;
        self.buffer[slot].as_ref().ok_or(RingError::IndexOutOfRange {
            index,
            len: self.len,
        })
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Result<&mut T, RingError> {
        let slot = self.physical(index)?;
        let len = self.len;
        self.buffer[slot]
            .as_mut()
            .ok_or(RingError::IndexOutOfRange { index, len })
    }

    pub(crate) fn set(&mut self, index: usize, item: T) -> Result<T, RingError> {
        let slot = self.get_mut(index)?;
        Ok(core::mem::replace(slot, item))
    }

    pub(crate) fn clear(&mut self) {
        while self.pop_front().is_ok() {}
        self.head = 0;
        self.tail = 0;
    }

    /// The occupied slots as at most two contiguous runs, front run first.
    pub(crate) fn segments(&self) -> (&[Option<T>], &[Option<T>]) {
        let capacity = self.capacity();
        let end = self.head + self.len;
        if end <= capacity {
            (&self.buffer[self.head..end], &[])
        } else {
            let (wrapped, front) = self.buffer.split_at(self.head);
            (front, &wrapped[..end - capacity])
        }
    }

    pub(crate) fn segments_mut(&mut self) -> (&mut [Option<T>], &mut [Option<T>]) {
        let capacity = self.capacity();
        let end = self.head + self.len;
        if end <= capacity {
            (&mut self.buffer[self.head..end], &mut [])
        } else {
            let (wrapped, front) = self.buffer.split_at_mut(self.head);
            (front, &mut wrapped[..end - capacity])
        }
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        let (front, back) = self.segments();
        Iter {
            front: front.iter(),
            back: back.iter(),
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (front, back) = self.segments_mut();
        IterMut {
            front: front.iter_mut(),
            back: back.iter_mut(),
        }
    }

    pub(crate) fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[RingBuffer]\nCapacity: {}\nSize: {}\nIsFull: {}\nIsEmpty: {}",
            self.capacity(),
            self.len,
            self.is_full(),
            self.is_empty()
        )
    }
}

/// Front-to-back iterator over a ring buffer, borrowing its storage.
///
/// Walks the two contiguous physical runs in turn; nothing is copied.
pub struct Iter<'a, T> {
    front: slice::Iter<'a, Option<T>>,
    back: slice::Iter<'a, Option<T>>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.front
            .next()
            .or_else(|| self.back.next())
            .and_then(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.front.len() + self.back.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.back
            .next_back()
            .or_else(|| self.front.next_back())
            .and_then(Option::as_ref)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Front-to-back iterator yielding mutable references.
pub struct IterMut<'a, T> {
    front: slice::IterMut<'a, Option<T>>,
    back: slice::IterMut<'a, Option<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.front.next() {
            Some(slot) => slot.as_mut(),
            None => self.back.next().and_then(Option::as_mut),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.front.len() + self.back.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self.back.next_back() {
            Some(slot) => slot.as_mut(),
            None => self.front.next_back().and_then(Option::as_mut),
        }
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize, head: usize, items: &[u32]) -> Slots<u32> {
        let mut slots = Slots::new(capacity).unwrap();
        // Rotate the start position so the occupied run begins at `head`.
        for _ in 0..head {
            slots.push_back(0);
            slots.pop_front().unwrap();
        }
        for &item in items {
            slots.push_back(item);
        }
        slots
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            Slots::<u8>::new(0).err(),
            Some(RingError::InvalidCapacity(0))
        );
    }

    #[test]
    fn segments_split_only_when_wrapped() {
        let slots = filled(4, 1, &[1, 2, 3]);
        let (front, back) = slots.segments();
        assert_eq!(front.len(), 3);
        assert!(back.is_empty());

        let slots = filled(4, 3, &[1, 2, 3]);
        let (front, back) = slots.segments();
        assert_eq!(front, &[Some(1)]);
        assert_eq!(back, &[Some(2), Some(3)]);
    }

    #[test]
    fn back_reads_slot_before_tail_at_zero() {
        // tail sits on physical slot 0, so the back element is in the last slot.
        let slots = filled(3, 2, &[7]);
        assert_eq!(slots.tail, 0);
        assert_eq!(slots.back(), Ok(&7));
        assert_eq!(slots.front(), Ok(&7));
    }

    #[test]
    fn pop_front_from_last_slot_wraps_head() {
        let mut slots = filled(3, 2, &[7, 8]);
        assert_eq!(slots.head, 2);
        assert_eq!(slots.pop_front(), Ok(7));
        assert_eq!(slots.head, 0);
        assert_eq!(slots.pop_front(), Ok(8));
        assert!(slots.is_empty());
    }

    #[test]
    fn popped_slot_is_cleared() {
        let mut slots = filled(2, 0, &[1, 2]);
        slots.pop_back().unwrap();
        assert!(slots.buffer[1].is_none());
        slots.pop_front().unwrap();
        assert!(slots.buffer.iter().all(Option::is_none));
    }

    #[test]
    fn clear_resets_indices() {
        let mut slots = filled(3, 2, &[1, 2, 3]);
        slots.clear();
        assert_eq!((slots.head, slots.tail, slots.len), (0, 0, 0));
        assert!(slots.buffer.iter().all(Option::is_none));
    }
}
