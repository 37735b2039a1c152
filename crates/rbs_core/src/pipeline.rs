//! Source/sink handoff over a [`SynchronizedRingBuffer`].
//!
//! The source always pushes at the front and the sink always pops at the
//! back, so items leave in the order they arrived. The source marks the
//! buffer exhausted when it stops for any reason, including an error or a
//! panic, which lets the sink drain what is left and return. The sink closes
//! the buffer when it stops, so a source waiting on a full buffer returns
//! instead of blocking forever after a sink panic.

use std::io::{self, Read, Write};
use std::panic;
use std::thread::{self, ScopedJoinHandle};

use thiserror::Error;

use crate::RingError;
use crate::sync::SynchronizedRingBuffer;

/// Buffer capacity used by the byte transfer when none is given.
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("cannot build transfer buffer")]
    Capacity(#[from] RingError),
    #[error("failed to read from source")]
    Read(#[source] io::Error),
    #[error("failed to write to sink")]
    Write(#[source] io::Error),
}

/// Byte counts of a finished transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferReport {
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// State shared by exactly one source thread and one sink thread.
///
/// Borrow it into both threads (for example with [`std::thread::scope`]);
/// the buffer with its exhaustion and closed flags is the only shared state.
#[derive(Debug)]
pub struct Pipeline<T> {
    buffer: SynchronizedRingBuffer<T>,
}

impl<T> Pipeline<T> {
    /// Creates the shared state around a blocking buffer of `capacity` slots.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Ok(Self {
            buffer: SynchronizedRingBuffer::new(capacity)?,
        })
    }

    /// The underlying buffer, for inspecting its state.
    pub fn buffer(&self) -> &SynchronizedRingBuffer<T> {
        &self.buffer
    }

    /// Source loop: pushes every item, then marks the buffer exhausted.
    ///
    /// Stops early if the sink has closed the buffer. Returns the number of
    /// items pushed.
    pub fn produce<I>(&self, items: I) -> u64
    where
        I: IntoIterator<Item = T>,
    {
        let _exhaust = ExhaustOnDrop(&self.buffer);
        let mut pushed = 0;
        for item in items {
            if self.buffer.push_front_or_closed(item).is_err() {
                break;
            }
            pushed += 1;
        }
        pushed
    }

    /// Source loop over fallible items. Stops at the first error, which is
    /// returned after the buffer has been marked exhausted. Also stops,
    /// without error, if the sink has closed the buffer.
    pub fn try_produce<I, E>(&self, items: I) -> Result<u64, E>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let _exhaust = ExhaustOnDrop(&self.buffer);
        let mut pushed = 0;
        for item in items {
            if self.buffer.push_front_or_closed(item?).is_err() {
                break;
            }
            pushed += 1;
        }
        Ok(pushed)
    }

    /// Sink loop: hands every item to `deliver` until the buffer is empty
    /// and exhausted. Returns the number of items delivered.
    pub fn consume<F>(&self, mut deliver: F) -> u64
    where
        F: FnMut(T),
    {
        let _close = CloseOnDrop(&self.buffer);
        let mut delivered = 0;
        while let Some(item) = self.buffer.pop_back_or_exhausted() {
            deliver(item);
            delivered += 1;
        }
        delivered
    }

    /// Sink loop with a fallible `deliver`.
    ///
    /// After the first error the remaining items are popped and dropped so a
    /// source blocked on a full buffer can still finish; the error is
    /// returned once the buffer is exhausted.
    pub fn try_consume<F, E>(&self, mut deliver: F) -> Result<u64, E>
    where
        F: FnMut(T) -> Result<(), E>,
    {
        let _close = CloseOnDrop(&self.buffer);
        let mut delivered = 0;
        let mut failure = None;
        while let Some(item) = self.buffer.pop_back_or_exhausted() {
            if failure.is_some() {
                continue;
            }
            match deliver(item) {
                Ok(()) => delivered += 1,
                Err(err) => failure = Some(err),
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(delivered),
        }
    }
}

struct ExhaustOnDrop<'a, T>(&'a SynchronizedRingBuffer<T>);

impl<T> Drop for ExhaustOnDrop<'_, T> {
    fn drop(&mut self) {
        self.0.mark_exhausted();
    }
}

struct CloseOnDrop<'a, T>(&'a SynchronizedRingBuffer<T>);

impl<T> Drop for CloseOnDrop<'_, T> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Copies `reader` to `writer` byte by byte through a ring buffer of
/// `capacity` slots, reading and writing on two separate threads.
///
/// Both streams are used one byte at a time; pass buffered adapters. The
/// writer is flushed before returning. A read error takes precedence over
/// a write error when both happen.
pub fn transfer<R, W>(
    reader: R,
    mut writer: W,
    capacity: usize,
) -> Result<TransferReport, TransferError>
where
    R: Read + Send,
    W: Write + Send,
{
    let pipeline = Pipeline::<u8>::new(capacity)?;
    let pipeline = &pipeline;

    let (read, written) = thread::scope(|scope| {
        let source = scope.spawn(move || pipeline.try_produce(reader.bytes()));
        let sink = scope.spawn(move || {
            let written = pipeline.try_consume(|byte| writer.write_all(&[byte]))?;
            writer.flush()?;
            Ok::<_, io::Error>(written)
        });
        (join(source), join(sink))
    });

    let bytes_read = read.map_err(TransferError::Read)?;
    let bytes_written = written.map_err(TransferError::Write)?;
    Ok(TransferReport {
        bytes_read,
        bytes_written,
    })
}

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| panic::resume_unwind(payload))
}
