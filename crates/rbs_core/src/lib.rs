//! Fixed-capacity ring buffers and the producer/consumer handoff built on them.
//!
//! The crate provides a non-concurrent double-ended buffer with an
//! overwrite-on-full policy, a mutex-guarded variant whose pushes and pops
//! block on a condition variable, and a two-thread pipeline that streams
//! items from a source to a sink through the blocking variant. The plain
//! buffer builds without `std`; the threaded parts need the `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use core::time::Duration;

use thiserror::Error;

/// Overwrite-on-full double-ended buffer with indexed access.
///
/// Keeps the most recent `capacity` elements and evicts from the opposite
/// end once full. Suited to bounded history retention where a producer must
/// never wait, such as keeping the last N log lines or samples.
pub mod deque;

/// Wraparound arithmetic for physical slot indices.
///
/// Small pure helpers that advance, retreat, and offset an index modulo the
/// buffer capacity. Every buffer in the crate routes its index updates
/// through these functions.
pub mod index;

/// Source and sink loops over a shared blocking buffer.
///
/// Couples one producer and one consumer through a
/// [`sync::SynchronizedRingBuffer`] and an exhaustion flag, and provides a
/// byte-stream transfer that runs both ends on scoped threads.
#[cfg(feature = "std")]
pub mod pipeline;

mod slots;

/// Thread-safe ring buffer with blocking push and pop.
///
/// Guards the slot array with a mutex and parks waiting threads on a
/// condition variable that is broadcast on every change. Whether a push on
/// a full buffer waits or overwrites is fixed at construction.
#[cfg(feature = "std")]
pub mod sync;

pub use slots::{Iter, IterMut};

/// Errors returned by ring buffer operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// The requested capacity is below one slot.
    ///
    /// Raised at construction only; no storage is allocated.
    #[error("ring buffer capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    /// A peek or pop found no element.
    ///
    /// Only the non-blocking buffer reports this; the synchronized buffer
    /// waits for an element instead.
    #[error("ring buffer is empty")]
    EmptyBuffer,

    /// A logical index is not below the current number of elements.
    ///
    /// Indices are never clamped or wrapped into range.
    #[error("index {index} out of range for ring buffer holding {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    /// A deadline-bounded wait expired before its condition held.
    #[error("ring buffer wait timed out after {0:?}")]
    Timeout(Duration),
}
