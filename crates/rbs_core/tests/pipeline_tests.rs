use std::io::{self, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rbs_core::RingError;
use rbs_core::pipeline::{self, Pipeline, TransferError, TransferReport};
use rbs_core::sync::{FullPolicy, SynchronizedRingBuffer};

#[test]
fn test_ten_thousand_integers_arrive_in_order() {
    let pipeline = Pipeline::new(16).unwrap();
    let mut received = Vec::with_capacity(10_000);

    let (pushed, delivered) = thread::scope(|scope| {
        let source = scope.spawn(|| pipeline.produce(0..10_000u32));
        let sink = scope.spawn(|| pipeline.consume(|item| received.push(item)));
        (source.join().unwrap(), sink.join().unwrap())
    });

    assert_eq!(pushed, 10_000);
    assert_eq!(delivered, 10_000);
    assert_eq!(received, (0..10_000).collect::<Vec<_>>());
    assert!(pipeline.buffer().is_empty());
    assert!(pipeline.buffer().is_exhausted());
}

#[test]
fn test_raw_buffer_handoff_with_arc() {
    let rb = Arc::new(SynchronizedRingBuffer::new(16).unwrap());

    let producer = {
        let rb = Arc::clone(&rb);
        thread::spawn(move || {
            for i in 0..10_000u32 {
                rb.push_back(i);
            }
            rb.mark_exhausted();
        })
    };
    let consumer = {
        let rb = Arc::clone(&rb);
        thread::spawn(move || {
            let mut seen = Vec::new();
            while let Some(item) = rb.pop_front_or_exhausted() {
                seen.push(item);
            }
            seen
        })
    };

    producer.join().unwrap();
    let seen = consumer.join().unwrap();
    assert_eq!(seen.len(), 10_000);
    assert!(seen.iter().copied().eq(0..10_000));
}

#[test]
fn test_capacity_one_handoff() {
    let pipeline = Pipeline::new(1).unwrap();
    let mut received = Vec::new();
    thread::scope(|scope| {
        scope.spawn(|| pipeline.produce("ring".chars()));
        scope.spawn(|| pipeline.consume(|c| received.push(c)));
    });
    assert_eq!(received.into_iter().collect::<String>(), "ring");
}

#[test]
fn test_producer_never_exceeds_capacity() {
    let rb = SynchronizedRingBuffer::new(4).unwrap();
    thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..1_000 {
                rb.push_front(i);
            }
            rb.mark_exhausted();
        });
        scope.spawn(|| {
            while rb.pop_back_or_exhausted().is_some() {
                assert!(rb.len() <= rb.capacity());
            }
        });
    });
    assert!(rb.is_empty());
}

#[test]
fn test_overwrite_buffer_rejects_zero_capacity() {
    assert_eq!(
        SynchronizedRingBuffer::<u8>::with_policy(0, FullPolicy::Overwrite).err(),
        Some(RingError::InvalidCapacity(0))
    );
}

#[test]
fn test_transfer_copies_bytes_unchanged() {
    let mut input = vec![0u8; 64 * 1024 + 7];
    StdRng::seed_from_u64(7).fill_bytes(&mut input);
    let mut output = Vec::new();

    let report = pipeline::transfer(&input[..], &mut output, 16).unwrap();

    assert_eq!(
        report,
        TransferReport {
            bytes_read: input.len() as u64,
            bytes_written: input.len() as u64,
        }
    );
    assert_eq!(output, input);
}

#[test]
fn test_transfer_empty_input() {
    let mut output = Vec::new();
    let report = pipeline::transfer(io::empty(), &mut output, 3).unwrap();
    assert_eq!(report, TransferReport::default());
    assert!(output.is_empty());
}

struct FailingReader {
    remaining: usize,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::other("source went away"));
        }
        let n = buf.len().min(self.remaining);
        buf[..n].fill(b'x');
        self.remaining -= n;
        Ok(n)
    }
}

struct FailingWriter {
    accepted: usize,
    limit: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.accepted >= self.limit {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        self.accepted += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_transfer_surfaces_read_error() {
    let mut output = Vec::new();
    let err = pipeline::transfer(FailingReader { remaining: 100 }, &mut output, 8).unwrap_err();
    assert!(matches!(err, TransferError::Read(_)));
    assert_eq!(output, vec![b'x'; 100]);
}

#[test]
fn test_transfer_surfaces_write_error_without_hanging() {
    let input = vec![1u8; 10_000];
    let writer = FailingWriter {
        accepted: 0,
        limit: 10,
    };
    let err = pipeline::transfer(&input[..], writer, 4).unwrap_err();
    match err {
        TransferError::Write(source) => assert_eq!(source.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("unexpected error: {other}"),
    }
}

struct PanickingWriter;

impl Write for PanickingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        panic!("sink writer exploded");
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` on a helper thread and reports whether it panicked, failing the
/// test if it has not returned within a few seconds.
fn panics_within_deadline<F>(f: F) -> bool
where
    F: FnOnce() + Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(f));
        let _ = done_tx.send(outcome.is_err());
    });
    done_rx
        .recv_timeout(Duration::from_secs(10))
        .expect("pipeline did not return after the sink panicked")
}

#[test]
fn test_transfer_returns_after_sink_panic() {
    let panicked = panics_within_deadline(|| {
        let input = [1u8; 1000];
        let _ = pipeline::transfer(&input[..], PanickingWriter, 4);
    });
    assert!(panicked);
}

#[test]
fn test_source_stops_when_sink_panics() {
    let panicked = panics_within_deadline(|| {
        let pipeline = Pipeline::<u32>::new(2).unwrap();
        let pushed = thread::scope(|scope| {
            let source = scope.spawn(|| pipeline.produce(0..100));
            let sink = scope.spawn(|| pipeline.consume(|_| panic!("sink gave up")));
            assert!(sink.join().is_err());
            source.join().unwrap()
        });
        assert!(pushed < 100);
        assert!(pipeline.buffer().is_closed());
        assert!(pipeline.buffer().is_exhausted());
    });
    assert!(!panicked);
}
