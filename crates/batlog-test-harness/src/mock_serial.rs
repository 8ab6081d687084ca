//! Mock transport for deterministic testing of the readout protocol.
//!
//! The readout protocol is push-only -- the adapter streams a block of
//! CR-terminated lines and the host never transmits -- so the mock is a
//! scripted feed rather than a request/response expectation queue. Bytes
//! are queued with [`MockTransport::feed`] (or [`feed_line`](MockTransport::feed_line))
//! and handed out chunk by chunk, which lets tests exercise partial-line
//! buffering in the scanner.
//!
//! # Example
//!
//! ```
//! use batlog_test_harness::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! mock.feed_line("-----------------------------------");
//! mock.feed_line("MANUFACTURER: RRC");
//! mock.feed_line("-----------------------------------");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

use batlog_core::error::{Error, Result};
use batlog_core::transport::Transport;

/// What `receive()` reports once the scripted feed is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrainedBehavior {
    /// Report end-of-stream (`Ok(0)`), as when the adapter closes the line.
    EndOfStream,
    /// Report [`Error::Timeout`], as when the adapter simply goes quiet.
    Timeout,
}

/// A scripted [`Transport`] for testing the protocol layer without
/// hardware.
///
/// Queued chunks are returned by `receive()` in order, split further if the
/// caller's buffer is smaller than a chunk. When the feed runs dry the mock
/// reports end-of-stream by default; call
/// [`hang_when_drained`](MockTransport::hang_when_drained) to simulate a
/// readout adapter that stops talking mid-block instead, which surfaces as
/// a timeout to the caller.
#[derive(Debug)]
pub struct MockTransport {
    /// Queued byte chunks, delivered front to back.
    chunks: VecDeque<Vec<u8>>,
    /// Read offset into the front chunk.
    cursor: usize,
    /// Whether the transport is "connected".
    connected: bool,
    /// How `receive()` behaves once `chunks` is empty.
    drained: DrainedBehavior,
}

impl MockTransport {
    /// Create a new mock transport in the connected state with an empty
    /// feed.
    pub fn new() -> Self {
        MockTransport {
            chunks: VecDeque::new(),
            cursor: 0,
            connected: true,
            drained: DrainedBehavior::EndOfStream,
        }
    }

    /// Queue raw bytes to be returned by subsequent `receive()` calls.
    ///
    /// Each `feed` call becomes one delivery chunk, so
    /// `feed(b"VOLT")` / `feed(b"AGE: 11155 mV\r")` exercises the
    /// scanner's partial-line accumulation.
    pub fn feed(&mut self, data: &[u8]) {
        self.chunks.push_back(data.to_vec());
    }

    /// Queue one readout line, appending the protocol's CR terminator.
    pub fn feed_line(&mut self, line: &str) {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\r');
        self.chunks.push_back(bytes);
    }

    /// Simulate an adapter that goes quiet once the feed is drained:
    /// `receive()` returns [`Error::Timeout`] instead of end-of-stream.
    pub fn hang_when_drained(&mut self) {
        self.drained = DrainedBehavior::Timeout;
    }

    /// Set the connected state of the mock transport.
    ///
    /// When `false`, subsequent `receive()` calls return
    /// [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Number of queued chunks not yet fully delivered.
    pub fn remaining_chunks(&self) -> usize {
        self.chunks.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        let Some(front) = self.chunks.front() else {
            return match self.drained {
                DrainedBehavior::EndOfStream => Ok(0),
                DrainedBehavior::Timeout => Err(Error::Timeout),
            };
        };

        let remaining = &front[self.cursor..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.cursor += n;
        if self.cursor >= front.len() {
            self.chunks.pop_front();
            self.cursor = 0;
        }
        Ok(n)
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.chunks.clear();
        self.cursor = 0;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_fed_bytes_in_order() {
        let mut mock = MockTransport::new();
        mock.feed(b"VOLTAGE: ");
        mock.feed(b"11155 mV\r");

        let mut buf = [0u8; 64];
        let n = mock.receive(&mut buf, Duration::from_millis(10)).await.unwrap();
        assert_eq!(&buf[..n], b"VOLTAGE: ");
        let n = mock.receive(&mut buf, Duration::from_millis(10)).await.unwrap();
        assert_eq!(&buf[..n], b"11155 mV\r");
    }

    #[tokio::test]
    async fn feed_line_appends_cr() {
        let mut mock = MockTransport::new();
        mock.feed_line("CHEMISTRY: LION");

        let mut buf = [0u8; 64];
        let n = mock.receive(&mut buf, Duration::from_millis(10)).await.unwrap();
        assert_eq!(&buf[..n], b"CHEMISTRY: LION\r");
    }

    #[tokio::test]
    async fn splits_chunk_across_small_buffers() {
        let mut mock = MockTransport::new();
        mock.feed(b"ABCDEF");

        let mut buf = [0u8; 4];
        let n = mock.receive(&mut buf, Duration::from_millis(10)).await.unwrap();
        assert_eq!(&buf[..n], b"ABCD");
        let n = mock.receive(&mut buf, Duration::from_millis(10)).await.unwrap();
        assert_eq!(&buf[..n], b"EF");
    }

    #[tokio::test]
    async fn drained_feed_reports_end_of_stream() {
        let mut mock = MockTransport::new();
        let mut buf = [0u8; 8];
        let n = mock.receive(&mut buf, Duration::from_millis(10)).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn drained_feed_can_hang_instead() {
        let mut mock = MockTransport::new();
        mock.hang_when_drained();

        let mut buf = [0u8; 8];
        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::Timeout));
    }

    #[tokio::test]
    async fn close_disconnects() {
        let mut mock = MockTransport::new();
        mock.feed(b"leftover");
        assert!(mock.is_connected());

        mock.close().await.unwrap();
        assert!(!mock.is_connected());
        assert_eq!(mock.remaining_chunks(), 0);

        let mut buf = [0u8; 8];
        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }

    #[tokio::test]
    async fn set_connected_false_blocks_receive() {
        let mut mock = MockTransport::new();
        mock.feed(b"data");
        mock.set_connected(false);

        let mut buf = [0u8; 8];
        let result = mock.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result.unwrap_err(), Error::NotConnected));
    }
}
