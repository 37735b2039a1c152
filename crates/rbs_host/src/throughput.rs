use crate::stats::HandoffLatency;
use anyhow::{Result, anyhow};
use rayon::prelude::*;
use rbs_core::pipeline::Pipeline;
use std::thread;
use std::time::{Duration, Instant};

struct CapacityRun {
    capacity: usize,
    delivered: u64,
    elapsed: Duration,
    latency: HandoffLatency,
}

pub fn run_benchmark(count: u64, capacities: &[usize]) -> Result<()> {
    println!("Handoff benchmark: {} items per capacity", count);
    println!("Capacities: {:?}", capacities);
    println!("Starting Benchmark (Parallel - Rayon)...");

    let runs = capacities
        .par_iter()
        .map(|&capacity| run_capacity(capacity, count))
        .collect::<Result<Vec<_>>>()?;

    for run in &runs {
        let seconds = run.elapsed.as_secs_f64();
        println!();
        println!("Results (capacity {})", run.capacity);
        println!("Time: {:.4} s", seconds);
        if seconds > 0.0 {
            println!("Throughput: {:.2} items/s", run.delivered as f64 / seconds);
        }
        println!("Delivered: {}/{}", run.delivered, count);
        run.latency.print_report();
    }

    Ok(())
}

/// Pushes `count` timestamps through a fresh pipeline; the sink records how
/// long each one waited in the buffer.
fn run_capacity(capacity: usize, count: u64) -> Result<CapacityRun> {
    let pipeline = Pipeline::<Instant>::new(capacity)?;
    let mut latency = HandoffLatency::new();

    let start = Instant::now();
    let delivered = thread::scope(|scope| {
        scope.spawn(|| pipeline.produce((0..count).map(|_| Instant::now())));
        let sink = scope.spawn(|| {
            pipeline.consume(|sent| latency.record(sent.elapsed().as_nanos() as u64))
        });
        sink.join()
    })
    .map_err(|_| anyhow!("Sink thread panicked (capacity {})", capacity))?;
    let elapsed = start.elapsed();

    Ok(CapacityRun {
        capacity,
        delivered,
        elapsed,
        latency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_item_is_delivered_and_timed() {
        let run = run_capacity(4, 500).unwrap();
        assert_eq!(run.delivered, 500);
        assert_eq!(run.latency.count(), 500);
    }

    #[test]
    fn zero_capacity_fails() {
        assert!(run_capacity(0, 10).is_err());
    }
}
