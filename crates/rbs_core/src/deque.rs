use core::fmt;

use crate::RingError;
use crate::slots::{Iter, IterMut, Slots};

/// Fixed-capacity double-ended buffer that overwrites the opposite end when full.
///
/// Keeps the most recent `capacity` elements pushed at either end. Pushing
/// at the back of a full buffer drops the front element and vice versa, so
/// the buffer never blocks and never refuses an element. Storage is
/// allocated once by [`CircularDeque::new`] and never grows.
pub struct CircularDeque<T> {
    slots: Slots<T>,
}

impl<T> CircularDeque<T> {
    /// Allocates a buffer with room for `capacity` elements.
    ///
    /// # Errors
    ///
    /// [`RingError::InvalidCapacity`] when `capacity` is zero. Nothing is
    /// allocated in that case.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Ok(Self {
            slots: Slots::new(capacity)?,
        })
    }

    /// Number of slots fixed at construction.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of elements currently stored.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no element is stored.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether every slot is occupied.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    /// Returns the front element without removing it.
    pub fn front(&self) -> Result<&T, RingError> {
        self.slots.front()
    }

    /// Returns the back element without removing it.
    pub fn back(&self) -> Result<&T, RingError> {
        self.slots.back()
    }

    /// Appends `item` at the back.
    ///
    /// When the buffer is full the current front element is evicted and
    /// returned; the length stays at capacity.
    pub fn push_back(&mut self, item: T) -> Option<T> {
        self.slots.push_back(item)
    }

    /// Prepends `item` at the front.
    ///
    /// When the buffer is full the current back element is evicted and
    /// returned; the length stays at capacity.
    pub fn push_front(&mut self, item: T) -> Option<T> {
        self.slots.push_front(item)
    }

    /// Removes and returns the back element, or [`RingError::EmptyBuffer`].
    pub fn pop_back(&mut self) -> Result<T, RingError> {
        self.slots.pop_back()
    }

    /// Removes and returns the front element, or [`RingError::EmptyBuffer`].
    pub fn pop_front(&mut self) -> Result<T, RingError> {
        self.slots.pop_front()
    }

    /// Element at logical position `index`, counted from the front.
    ///
    /// # Errors
    ///
    /// [`RingError::IndexOutOfRange`] unless `index < len()`.
    pub fn get(&self, index: usize) -> Result<&T, RingError> {
        self.slots.get(index)
    }

    /// Mutable access to the element at logical position `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, RingError> {
        self.slots.get_mut(index)
    }

    /// Replaces the element at logical position `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// [`RingError::IndexOutOfRange`] unless `index < len()`.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, RingError> {
        self.slots.set(index, item)
    }

    /// Drops every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Iterates from front to back without copying the elements.
    ///
    /// Each call starts a fresh pass over the current contents.
    pub fn iter(&self) -> Iter<'_, T> {
        self.slots.iter()
    }

    /// Iterates from front to back, yielding mutable references.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.slots.iter_mut()
    }
}

impl<T> Extend<T> for CircularDeque<T> {
    /// Pushes every item at the back, evicting from the front once full.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a CircularDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut CircularDeque<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for CircularDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// Diagnostic summary for logs; not a serialization format.
impl<T> fmt::Display for CircularDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.slots.describe(f)
    }
}
