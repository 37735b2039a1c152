use anyhow::{Context, Result};
use rbs_core::pipeline;
use rbs_io::endpoint;
use std::time::Instant;

/// Streams `input` to `output` through a blocking ring buffer of `capacity`
/// slots. Progress goes to stderr so stdout can carry the data.
pub fn run_copy(input: &str, output: &str, capacity: usize) -> Result<()> {
    eprintln!("RING BUFFER COPY");
    eprintln!("Input: {}", input);
    eprintln!("Output: {}", output);
    eprintln!("Capacity: {} slots", capacity);
    eprintln!("-------------------------------");

    let expected = endpoint::input_len(input);
    let reader = endpoint::open_input(input)?;
    let writer = endpoint::open_output(output)?;

    let start = Instant::now();
    let report = pipeline::transfer(reader, writer, capacity).context("Transfer failed")?;
    let seconds = start.elapsed().as_secs_f64();

    if let Some(expected) = expected {
        if expected != report.bytes_read {
            eprintln!(
                "Warning: input changed during copy ({} bytes at open, {} read)",
                expected, report.bytes_read
            );
        }
    }

    let mib = report.bytes_written as f64 / (1024.0 * 1024.0);
    eprintln!(
        "Bytes: {} read, {} written",
        report.bytes_read, report.bytes_written
    );
    eprintln!("Time: {:.4} s", seconds);
    if seconds > 0.0 {
        eprintln!("Throughput: {:.2} MiB/s", mib / seconds);
    }
    Ok(())
}
