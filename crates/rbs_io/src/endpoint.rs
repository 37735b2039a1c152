use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Path that selects stdin for input and stdout for output.
pub const STDIO_PATH: &str = "-";

/// A buffered byte source owned by the reading thread.
pub type Input = Box<dyn Read + Send>;

/// A buffered byte sink owned by the writing thread.
pub type Output = Box<dyn Write + Send>;

/// Opens `path` for reading, or stdin when `path` is `-`.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Input> {
    let path = path.as_ref();
    if is_stdio(path) {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path)
        .with_context(|| format!("Failed to open input {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Creates (or truncates) `path` for writing, or stdout when `path` is `-`.
pub fn open_output<P: AsRef<Path>>(path: P) -> Result<Output> {
    let path = path.as_ref();
    if is_stdio(path) {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create output {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Size of the input in bytes when it is a regular file.
pub fn input_len<P: AsRef<Path>>(path: P) -> Option<u64> {
    let path = path.as_ref();
    if is_stdio(path) {
        return None;
    }
    std::fs::metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len())
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}
