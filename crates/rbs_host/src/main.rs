mod stats;
mod stream;
mod throughput;
mod window;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rbs_core::pipeline::DEFAULT_CAPACITY;

#[derive(Parser)]
#[command(name = "rbs", about = "Ring buffer streaming tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a byte stream through a bounded two-thread ring buffer.
    Copy {
        #[arg(short, long, default_value = "-")]
        input: String,
        #[arg(short, long, default_value = "-")]
        output: String,
        #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,
    },
    /// Keep the most recent values in an overwrite-on-full window and print it.
    Window {
        #[arg(short, long, default_value_t = 5)]
        capacity: usize,
        /// Push at the front instead of the back.
        #[arg(long)]
        front: bool,
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },
    /// Measure handoff throughput and latency for several capacities.
    Bench {
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        count: u64,
        #[arg(long, value_delimiter = ',', default_values_t = [1, 16, 1024])]
        capacities: Vec<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Copy {
            input,
            output,
            capacity,
        } => {
            stream::run_copy(&input, &output, capacity)?;
        }
        Commands::Window {
            capacity,
            front,
            values,
        } => {
            window::run_window(capacity, front, &values)?;
        }
        Commands::Bench { count, capacities } => {
            throughput::run_benchmark(count, &capacities)?;
        }
    }
    Ok(())
}
