//! Stream endpoints for the ring buffer transfer tools.
//!
//! Opens the byte streams that feed the source thread and receive the sink
//! thread's output, so the host binary never deals with raw file handles.

/// Opening input and output streams from command-line paths.
///
/// Resolves `-` to the process's standard streams, opens everything else as
/// a file, and wraps the result in a buffered adapter suitable for
/// byte-at-a-time transfer.
pub mod endpoint;
