//! Carriage-return line scanner over a [`Transport`].
//!
//! The readout adapter streams ASCII lines terminated with a bare CR. The
//! scanner is a pure delimiter transform: it accumulates transport reads in
//! a bounded buffer and yields one logical line per CR-terminated segment,
//! with the terminator stripped. No semantic interpretation happens here.
//!
//! The decode step ([`split_line`]) is a pure function over the buffered
//! bytes in the same shape as the rest of the codec layer: it either yields
//! a line plus a consumed count, or reports that more data is needed.

use std::time::Duration;

use batlog_core::error::{Error, Result};
use batlog_core::transport::Transport;

/// The carriage return that terminates every readout line.
pub const CR: u8 = b'\r';

/// Default bound on a single line, in bytes, before a CR must be seen.
pub const DEFAULT_MAX_LINE_LEN: usize = 1130;

/// Default transport idle-read timeout while waiting for the next line.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of attempting to split one line from a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// A complete line was found.
    Line {
        /// The line text with the CR terminator stripped and a stray
        /// leading LF (from CRLF transports) normalized away.
        text: String,
        /// Number of bytes consumed from the input buffer, including the
        /// terminator.
        consumed: usize,
    },
    /// The buffer does not yet contain a CR. More data is needed.
    Incomplete,
}

/// Attempt to split one CR-terminated line off the front of `buf`.
pub fn split_line(buf: &[u8]) -> ScanResult {
    match buf.iter().position(|&b| b == CR) {
        Some(pos) => ScanResult::Line {
            text: normalize_token(&buf[..pos]),
            consumed: pos + 1,
        },
        None => ScanResult::Incomplete,
    }
}

/// Convert a raw line segment to text.
///
/// The wire is ASCII; anything else is replaced rather than rejected so a
/// noisy line degrades into an unrecognized field instead of aborting the
/// readout. A leading LF left over from a CRLF-terminated previous line is
/// dropped.
fn normalize_token(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix('\n') {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    }
}

/// Configuration for a [`LineScanner`].
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Fatal bound on a single segment before a CR is seen.
    pub max_line_len: usize,
    /// How long one transport read may wait for data.
    pub read_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Lazy line reader over a transport stream.
///
/// Yields one line per call until the stream ends. A non-empty partial
/// segment at end-of-input is flushed as the final line. The underlying
/// stream is not seekable; create one scanner per transport session.
pub struct LineScanner<'a> {
    transport: &'a mut dyn Transport,
    config: ScanConfig,
    buf: Vec<u8>,
    eof: bool,
}

impl<'a> LineScanner<'a> {
    /// Create a scanner over `transport` with the given bounds.
    pub fn new(transport: &'a mut dyn Transport, config: ScanConfig) -> Self {
        LineScanner {
            transport,
            config,
            buf: Vec::new(),
            eof: false,
        }
    }

    /// Read the next logical line.
    ///
    /// Returns `Ok(None)` once the stream has ended and the buffer is
    /// drained. Fails with [`Error::Frame`] if a segment exceeds the line
    /// bound before a CR arrives; transport errors (including
    /// [`Error::Timeout`]) propagate unchanged.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let ScanResult::Line { text, consumed } = split_line(&self.buf) {
                self.buf.drain(..consumed);
                return Ok(Some(text));
            }

            if self.buf.len() >= self.config.max_line_len {
                return Err(Error::Frame(format!(
                    "line exceeds {} bytes without a carriage return",
                    self.config.max_line_len
                )));
            }

            if self.eof {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                // Trailing partial segment: flush as the final token.
                let text = normalize_token(&self.buf);
                self.buf.clear();
                return Ok(Some(text));
            }

            let mut chunk = [0u8; 256];
            let n = self
                .transport
                .receive(&mut chunk, self.config.read_timeout)
                .await?;
            if n == 0 {
                tracing::debug!(buffered = self.buf.len(), "readout stream ended");
                self.eof = true;
            } else {
                self.buf.extend_from_slice(&chunk[..n]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batlog_test_harness::MockTransport;

    // -----------------------------------------------------------------
    // split_line -- pure decode step
    // -----------------------------------------------------------------

    #[test]
    fn split_empty_buffer_is_incomplete() {
        assert_eq!(split_line(b""), ScanResult::Incomplete);
    }

    #[test]
    fn split_without_cr_is_incomplete() {
        assert_eq!(split_line(b"VOLTAGE: 11155 mV"), ScanResult::Incomplete);
    }

    #[test]
    fn split_consumes_through_terminator() {
        assert_eq!(
            split_line(b"VOLTAGE: 11155 mV\rCURRENT"),
            ScanResult::Line {
                text: "VOLTAGE: 11155 mV".into(),
                consumed: 18,
            }
        );
    }

    #[test]
    fn split_empty_line() {
        assert_eq!(
            split_line(b"\rnext"),
            ScanResult::Line {
                text: String::new(),
                consumed: 1,
            }
        );
    }

    #[test]
    fn split_normalizes_crlf_leftover() {
        // After "...\r\n", the LF lands at the start of the next token.
        assert_eq!(
            split_line(b"\nCHEMISTRY: LION\r"),
            ScanResult::Line {
                text: "CHEMISTRY: LION".into(),
                consumed: 17,
            }
        );
    }

    // -----------------------------------------------------------------
    // LineScanner -- transport-driven
    // -----------------------------------------------------------------

    #[tokio::test]
    async fn scanner_yields_lines_across_chunk_boundaries() {
        let mut mock = MockTransport::new();
        mock.feed(b"VOLT");
        mock.feed(b"AGE: 11155 mV\rCURRENT: ");
        mock.feed(b"-21 mA\r");

        let mut scanner = LineScanner::new(&mut mock, ScanConfig::default());
        assert_eq!(
            scanner.next_line().await.unwrap().unwrap(),
            "VOLTAGE: 11155 mV"
        );
        assert_eq!(scanner.next_line().await.unwrap().unwrap(), "CURRENT: -21 mA");
        assert_eq!(scanner.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn scanner_flushes_trailing_partial_segment() {
        let mut mock = MockTransport::new();
        mock.feed(b"COMPLETE\rpartial tail");

        let mut scanner = LineScanner::new(&mut mock, ScanConfig::default());
        assert_eq!(scanner.next_line().await.unwrap().unwrap(), "COMPLETE");
        assert_eq!(scanner.next_line().await.unwrap().unwrap(), "partial tail");
        assert_eq!(scanner.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn scanner_ends_cleanly_on_empty_stream() {
        let mut mock = MockTransport::new();
        let mut scanner = LineScanner::new(&mut mock, ScanConfig::default());
        assert_eq!(scanner.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn scanner_overflow_is_fatal() {
        let mut mock = MockTransport::new();
        // 2000 bytes with no CR anywhere.
        mock.feed(&vec![b'x'; 2000]);

        let mut scanner = LineScanner::new(&mut mock, ScanConfig::default());
        let err = scanner.next_line().await.unwrap_err();
        match err {
            Error::Frame(msg) => assert!(msg.contains("1130")),
            other => panic!("expected Frame error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn scanner_respects_custom_bound() {
        let mut mock = MockTransport::new();
        mock.feed(b"0123456789abcdef");

        let config = ScanConfig {
            max_line_len: 8,
            ..ScanConfig::default()
        };
        let mut scanner = LineScanner::new(&mut mock, config);
        assert!(matches!(
            scanner.next_line().await.unwrap_err(),
            Error::Frame(_)
        ));
    }

    #[tokio::test]
    async fn scanner_propagates_timeout() {
        let mut mock = MockTransport::new();
        mock.feed(b"half a li");
        mock.hang_when_drained();

        let mut scanner = LineScanner::new(&mut mock, ScanConfig::default());
        assert!(matches!(
            scanner.next_line().await.unwrap_err(),
            Error::Timeout
        ));
    }

    #[tokio::test]
    async fn scanner_handles_crlf_wire() {
        let mut mock = MockTransport::new();
        mock.feed(b"MANUFACTURER: RRC\r\nBATTERY NAME: RRC2020\r\n");

        let mut scanner = LineScanner::new(&mut mock, ScanConfig::default());
        assert_eq!(
            scanner.next_line().await.unwrap().unwrap(),
            "MANUFACTURER: RRC"
        );
        assert_eq!(
            scanner.next_line().await.unwrap().unwrap(),
            "BATTERY NAME: RRC2020"
        );
        // The final LF flushes as an empty token at end of stream.
        assert_eq!(scanner.next_line().await.unwrap().unwrap(), "");
        assert_eq!(scanner.next_line().await.unwrap(), None);
    }
}
