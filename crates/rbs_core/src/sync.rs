use core::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::RingError;
use crate::slots::Slots;

/// What a push does when the buffer is already full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullPolicy {
    /// Suspend the pushing thread until a pop frees a slot.
    #[default]
    Block,
    /// Evict the element at the opposite end, like [`crate::deque::CircularDeque`].
    Overwrite,
}

type PushFn<T> = fn(&mut Slots<T>, T) -> Option<T>;
type PopFn<T> = fn(&mut Slots<T>) -> Result<T, RingError>;

struct State<T> {
    slots: Slots<T>,
    exhausted: bool,
    closed: bool,
}

/// Bounded ring buffer shared between a producer and a consumer thread.
///
/// One mutex guards the slots and the exhaustion flag. Every state change
/// wakes all waiters on a single condition variable, and each waiter
/// re-checks its own predicate before touching the slots, so a wake meant
/// for the other side is harmless.
///
/// Waits are unbounded in the plain `push_*`/`pop_*` calls: with no
/// counterpart thread they never return. The `try_*` and `*_timeout`
/// variants bound the wait, and the `*_or_closed` pushes return once the
/// consumer has called [`close`](SynchronizedRingBuffer::close).
pub struct SynchronizedRingBuffer<T> {
    state: Mutex<State<T>>,
    changed: Condvar,
    capacity: usize,
    policy: FullPolicy,
}

impl<T> SynchronizedRingBuffer<T> {
    /// Creates a buffer whose pushes block while it is full.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Self::with_policy(capacity, FullPolicy::Block)
    }

    /// Creates a buffer with an explicit full-buffer policy.
    pub fn with_policy(capacity: usize, policy: FullPolicy) -> Result<Self, RingError> {
        let slots = Slots::new(capacity)?;
        Ok(Self {
            state: Mutex::new(State {
                slots,
                exhausted: false,
                closed: false,
            }),
            changed: Condvar::new(),
            capacity,
            policy,
        })
    }

    /// Number of slots fixed at construction.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Full-buffer policy fixed at construction.
    #[inline(always)]
    pub fn policy(&self) -> FullPolicy {
        self.policy
    }

    /// Number of elements currently stored.
    pub fn len(&self) -> usize {
        self.state.lock().slots.len()
    }

    /// Whether no element is stored.
    pub fn is_empty(&self) -> bool {
        self.state.lock().slots.is_empty()
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.state.lock().slots.is_full()
    }

    /// Pushes at the back, waiting for room under [`FullPolicy::Block`].
    ///
    /// Returns the evicted front element under [`FullPolicy::Overwrite`].
    pub fn push_back(&self, item: T) -> Option<T> {
        self.push_with(item, Slots::push_back)
    }

    /// Pushes at the front, waiting for room under [`FullPolicy::Block`].
    ///
    /// Returns the evicted back element under [`FullPolicy::Overwrite`].
    pub fn push_front(&self, item: T) -> Option<T> {
        self.push_with(item, Slots::push_front)
    }

    /// Removes the back element, waiting while the buffer is empty.
    pub fn pop_back(&self) -> T {
        self.pop_with(Slots::pop_back)
    }

    /// Removes the front element, waiting while the buffer is empty.
    pub fn pop_front(&self) -> T {
        self.pop_with(Slots::pop_front)
    }

    /// Pushes at the back only if that needs no wait; `Err(item)` otherwise.
    pub fn try_push_back(&self, item: T) -> Result<Option<T>, T> {
        self.push_within(item, Some(Instant::now()), Slots::push_back)
    }

    /// Pushes at the front only if that needs no wait; `Err(item)` otherwise.
    pub fn try_push_front(&self, item: T) -> Result<Option<T>, T> {
        self.push_within(item, Some(Instant::now()), Slots::push_front)
    }

    /// Removes the back element if one is present, without waiting.
    pub fn try_pop_back(&self) -> Option<T> {
        self.pop_within(Some(Instant::now()), Slots::pop_back)
    }

    /// Removes the front element if one is present, without waiting.
    pub fn try_pop_front(&self) -> Option<T> {
        self.pop_within(Some(Instant::now()), Slots::pop_front)
    }

    /// Like [`push_back`](Self::push_back), giving the item back as
    /// `Err(item)` if no slot frees up within `timeout`.
    pub fn push_back_timeout(&self, item: T, timeout: Duration) -> Result<Option<T>, T> {
        self.push_within(item, deadline(timeout), Slots::push_back)
    }

    /// Like [`push_front`](Self::push_front), giving the item back as
    /// `Err(item)` if no slot frees up within `timeout`.
    pub fn push_front_timeout(&self, item: T, timeout: Duration) -> Result<Option<T>, T> {
        self.push_within(item, deadline(timeout), Slots::push_front)
    }

    /// Like [`pop_back`](Self::pop_back), failing with [`RingError::Timeout`]
    /// if nothing arrives within `timeout`.
    pub fn pop_back_timeout(&self, timeout: Duration) -> Result<T, RingError> {
        self.pop_within(deadline(timeout), Slots::pop_back)
            .ok_or(RingError::Timeout(timeout))
    }

    /// Like [`pop_front`](Self::pop_front), failing with [`RingError::Timeout`]
    /// if nothing arrives within `timeout`.
    pub fn pop_front_timeout(&self, timeout: Duration) -> Result<T, RingError> {
        self.pop_within(deadline(timeout), Slots::pop_front)
            .ok_or(RingError::Timeout(timeout))
    }

    /// Records that the producer will push nothing more and wakes all waiters.
    ///
    /// Calling it again has no further effect.
    pub fn mark_exhausted(&self) {
        let mut state = self.state.lock();
        state.exhausted = true;
        self.changed.notify_all();
    }

    /// Whether [`mark_exhausted`](Self::mark_exhausted) has been called.
    pub fn is_exhausted(&self) -> bool {
        self.state.lock().exhausted
    }

    /// Records that the consumer will pop nothing more and wakes all waiters.
    ///
    /// Producers waiting in a `*_or_closed` push get their item back.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.changed.notify_all();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Pushes at the back like [`push_back`](Self::push_back), but returns
    /// `Err(item)` instead of waiting once the buffer is closed.
    pub fn push_back_or_closed(&self, item: T) -> Result<Option<T>, T> {
        self.push_until_closed(item, Slots::push_back)
    }

    /// Pushes at the front like [`push_front`](Self::push_front), but returns
    /// `Err(item)` instead of waiting once the buffer is closed.
    pub fn push_front_or_closed(&self, item: T) -> Result<Option<T>, T> {
        self.push_until_closed(item, Slots::push_front)
    }

    /// Removes the back element, or returns `None` once the buffer is both
    /// empty and exhausted.
    ///
    /// Emptiness and the flag are read under the same lock, so a producer
    /// finishing between the two checks cannot strand the caller.
    pub fn pop_back_or_exhausted(&self) -> Option<T> {
        self.pop_until_exhausted(Slots::pop_back)
    }

    /// Removes the front element, or returns `None` once the buffer is both
    /// empty and exhausted.
    pub fn pop_front_or_exhausted(&self) -> Option<T> {
        self.pop_until_exhausted(Slots::pop_front)
    }

    fn push_with(&self, item: T, push: PushFn<T>) -> Option<T> {
        let mut state = self.state.lock();
        if self.policy == FullPolicy::Block {
            while state.slots.is_full() {
                self.changed.wait(&mut state);
            }
        }
        let evicted = push(&mut state.slots, item);
        self.changed.notify_all();
        evicted
    }

    fn push_until_closed(&self, item: T, push: PushFn<T>) -> Result<Option<T>, T> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(item);
            }
            if self.policy == FullPolicy::Overwrite || !state.slots.is_full() {
                break;
            }
            self.changed.wait(&mut state);
        }
        let evicted = push(&mut state.slots, item);
        self.changed.notify_all();
        Ok(evicted)
    }

    fn pop_with(&self, pop: PopFn<T>) -> T {
        let mut state = self.state.lock();
        loop {
            if let Ok(item) = pop(&mut state.slots) {
                self.changed.notify_all();
                return item;
            }
            self.changed.wait(&mut state);
        }
    }

    fn pop_until_exhausted(&self, pop: PopFn<T>) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Ok(item) = pop(&mut state.slots) {
                self.changed.notify_all();
                return Some(item);
            }
            if state.exhausted {
                return None;
            }
            self.changed.wait(&mut state);
        }
    }

    fn push_within(
        &self,
        item: T,
        deadline: Option<Instant>,
        push: PushFn<T>,
    ) -> Result<Option<T>, T> {
        let mut state = self.state.lock();
        let mut timed_out = false;
        while self.policy == FullPolicy::Block && state.slots.is_full() {
            if timed_out {
                return Err(item);
            }
            timed_out = self.wait(&mut state, deadline);
        }
        let evicted = push(&mut state.slots, item);
        self.changed.notify_all();
        Ok(evicted)
    }

    fn pop_within(&self, deadline: Option<Instant>, pop: PopFn<T>) -> Option<T> {
        let mut state = self.state.lock();
        let mut timed_out = false;
        loop {
            if let Ok(item) = pop(&mut state.slots) {
                self.changed.notify_all();
                return Some(item);
            }
            if timed_out {
                return None;
            }
            timed_out = self.wait(&mut state, deadline);
        }
    }

    /// Returns `true` once `deadline` has passed.
    fn wait(&self, state: &mut MutexGuard<'_, State<T>>, deadline: Option<Instant>) -> bool {
        match deadline {
            Some(deadline) => {
                Instant::now() >= deadline || self.changed.wait_until(state, deadline).timed_out()
            }
            None => {
                self.changed.wait(state);
                false
            }
        }
    }
}

/// `None` when `timeout` is too large to represent, meaning wait forever.
fn deadline(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

impl<T> fmt::Debug for SynchronizedRingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SynchronizedRingBuffer")
            .field("capacity", &self.capacity)
            .field("len", &state.slots.len())
            .field("policy", &self.policy)
            .field("exhausted", &state.exhausted)
            .field("closed", &state.closed)
            .finish()
    }
}

impl<T> fmt::Display for SynchronizedRingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.state.lock().slots.describe(f)
    }
}
