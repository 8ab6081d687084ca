//! Error types for batlog.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer, readout-stream, and
//! record-store errors are all captured here.
//!
//! Field-level conversion failures are deliberately *not* part of this
//! taxonomy: a value that fails to parse leaves its field at zero and is
//! aggregated into the readout's warning list instead of aborting the scan.

/// The error type for all batlog operations.
///
/// Variants cover the failure modes of a readout session: physical
/// transport failures, a malformed or truncated readout stream, and
/// record-store failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (serial port open/read failure).
    #[error("transport error: {0}")]
    Transport(String),

    /// Timed out waiting for readout data.
    ///
    /// This typically indicates the pack is not attached, the wrong port is
    /// configured, or the readout adapter stopped mid-block. A timeout is
    /// always fatal to the readout in progress.
    #[error("timeout waiting for readout data")]
    Timeout,

    /// No connection to the readout adapter has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the readout adapter was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// The readout stream violated the line framing: a segment exceeded the
    /// line-length bound before a carriage return, or the stream ended
    /// before the readout block was closed.
    ///
    /// No partial record may be treated as valid after this error.
    #[error("malformed readout stream: {0}")]
    Frame(String),

    /// A record-store failure (backing directory unreachable, or a record
    /// that cannot be serialized or deserialized).
    #[error("store error: {0}")]
    Store(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
