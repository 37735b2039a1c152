//! Handoff latency accounting for the benchmark.
//!
//! Measures how long an item sits in the ring buffer between the source's
//! push and the sink's pop, and summarises the samples as min/avg/max plus
//! a coarse histogram.

/// Width of one histogram bucket in nanoseconds (10 us).
const BUCKET_NS: u64 = 10_000;

/// Number of buckets; the last one also collects everything slower.
const BUCKETS: usize = 20;

/// Running summary of handoff latencies in nanoseconds.
///
/// Updated once per popped item on the sink thread, so every operation is
/// plain arithmetic with no allocation.
#[derive(Debug, Clone)]
pub struct HandoffLatency {
    min: u64,
    max: u64,
    sum: u128,
    count: u64,
    buckets: [u64; BUCKETS],
}

impl Default for HandoffLatency {
    fn default() -> Self {
        Self::new()
    }
}

impl HandoffLatency {
    pub fn new() -> Self {
        Self {
            min: u64::MAX,
            max: 0,
            sum: 0,
            count: 0,
            buckets: [0; BUCKETS],
        }
    }

    pub fn record(&mut self, nanos: u64) {
        self.min = self.min.min(nanos);
        self.max = self.max.max(nanos);
        self.sum += u128::from(nanos);
        self.count += 1;

        let idx = ((nanos / BUCKET_NS) as usize).min(BUCKETS - 1);
        self.buckets[idx] += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean latency in nanoseconds; 0.0 before the first sample.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    /// Prints the summary, switching to microseconds once the mean reaches 1 us.
    pub fn print_report(&self) {
        println!("Handoff Latency (push to pop)");
        println!("Count: {}", self.count());
        if self.count == 0 {
            return;
        }

        let mean = self.mean();
        if mean < 1000.0 {
            println!("Min:   {:.2} ns", self.min as f64);
            println!("Avg:   {:.2} ns", mean);
            println!("Max:   {:.2} ns", self.max as f64);
        } else {
            println!("Min:   {:.2} us", self.min as f64 / 1000.0);
            println!("Avg:   {:.2} us", mean / 1000.0);
            println!("Max:   {:.2} us", self.max as f64 / 1000.0);
        }

        println!("Distribution (10us buckets):");
        for (i, &count) in self.buckets.iter().enumerate() {
            if count > 0 {
                let lower = i as u64 * BUCKET_NS / 1000;
                let upper = (i as u64 + 1) * BUCKET_NS / 1000;
                let open = if i == BUCKETS - 1 { "+" } else { "" };
                println!("[{:3}-{:3}{} us]: {}", lower, upper, open, count);
            }
        }
    }
}
