//! Readout block parser: a small state machine over scanned lines.
//!
//! The adapter frames one readout as a block of `LABEL: value` lines
//! between two occurrences of a fixed boundary marker. [`BlockParser`] is
//! the pure state machine fed one line at a time; [`read_readout`] drives
//! it from a transport and stops pulling lines the moment the closing
//! marker arrives.
//!
//! Inside a block every recoverable problem -- an unknown label, a value
//! that fails coercion -- is collected and reported, never fatal. The fatal
//! conditions are framing conditions: the stream ending (or going quiet)
//! before the block closes. No record produced by such a stream is valid.

use chrono::Local;

use batlog_core::error::{Error, Result};
use batlog_core::helpers;
use batlog_core::record::{BatteryRecord, UnrecognizedField};
use batlog_core::transport::Transport;

use crate::coerce::{self, ConversionError};
use crate::fields::{self, Slot};
use crate::scan::{LineScanner, ScanConfig, DEFAULT_MAX_LINE_LEN, DEFAULT_READ_TIMEOUT};

/// The boundary marker framing a readout block: exactly 35 dashes.
pub const BLOCK_MARKER: &str = "-----------------------------------";

/// Configuration for one readout session.
///
/// Passed in at construction rather than read from ambient globals so that
/// multiple sessions (and tests) don't collide.
#[derive(Debug, Clone)]
pub struct ReadoutConfig {
    /// The exact boundary marker line.
    pub marker: String,
    /// Fatal bound on a single line before a CR is seen.
    pub max_line_len: usize,
    /// Transport idle-read timeout while waiting for lines.
    pub read_timeout: std::time::Duration,
}

impl Default for ReadoutConfig {
    fn default() -> Self {
        ReadoutConfig {
            marker: BLOCK_MARKER.to_string(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// A completed readout: the typed record plus everything the parser could
/// not place in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    /// The accumulated record, stamped with the acquisition instant.
    pub record: BatteryRecord,
    /// Labels not present in the dispatch table, with their raw values.
    pub unrecognized: Vec<UnrecognizedField>,
    /// Field values that failed coercion; the fields are zero in the
    /// record.
    pub warnings: Vec<ConversionError>,
}

/// Block scanning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    /// Outside a block; everything except the marker is ignored.
    Idle,
    /// Between the markers, collecting fields.
    InBlock,
    /// The closing marker has been seen; no further input is consumed.
    Closed,
}

/// What one pushed line did to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Line outside the block (or after close); nothing happened.
    Ignored,
    /// The opening marker; field collection begins.
    Opened,
    /// A line consumed while in the block.
    Field,
    /// The closing marker; the block is complete and scanning must stop.
    Closed,
}

/// The readout state machine, fed one scanned line at a time.
pub struct BlockParser {
    marker: String,
    state: BlockState,
    record: BatteryRecord,
    unrecognized: Vec<UnrecognizedField>,
    warnings: Vec<ConversionError>,
}

impl BlockParser {
    /// Create a parser expecting the given boundary marker.
    pub fn new(marker: impl Into<String>) -> Self {
        BlockParser {
            marker: marker.into(),
            state: BlockState::Idle,
            record: BatteryRecord::default(),
            unrecognized: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Whether the closing marker has been seen.
    pub fn is_closed(&self) -> bool {
        self.state == BlockState::Closed
    }

    /// Feed one scanned line through the state machine.
    pub fn push_line(&mut self, line: &str) -> LineOutcome {
        if line == self.marker {
            return match self.state {
                BlockState::Idle => {
                    tracing::debug!("readout block opened");
                    self.state = BlockState::InBlock;
                    LineOutcome::Opened
                }
                BlockState::InBlock => {
                    tracing::debug!(
                        fields_unrecognized = self.unrecognized.len(),
                        warnings = self.warnings.len(),
                        "readout block closed"
                    );
                    self.state = BlockState::Closed;
                    LineOutcome::Closed
                }
                BlockState::Closed => LineOutcome::Ignored,
            };
        }

        if self.state != BlockState::InBlock {
            return LineOutcome::Ignored;
        }

        match line.split_once(':') {
            Some((label, value)) => self.apply(label.trim(), value.trim()),
            None => {
                // A field line is LABEL: value; anything else inside the
                // block is kept as a diagnostic rather than trusted.
                let label = line.trim();
                if !label.is_empty() {
                    self.unrecognized.push(UnrecognizedField {
                        label: label.to_string(),
                        value: String::new(),
                    });
                }
            }
        }
        LineOutcome::Field
    }

    /// Finalize a closed block into a [`Readout`] stamped with `timestamp`.
    ///
    /// Callers must only finalize after [`push_line`](Self::push_line)
    /// returned [`LineOutcome::Closed`].
    pub fn finish(mut self, timestamp: String) -> Readout {
        debug_assert!(self.is_closed(), "finalizing an unclosed block");
        self.record.timestamp = timestamp;
        Readout {
            record: self.record,
            unrecognized: self.unrecognized,
            warnings: self.warnings,
        }
    }

    fn apply(&mut self, label: &str, value: &str) {
        let Some(spec) = fields::lookup(label) else {
            self.unrecognized.push(UnrecognizedField {
                label: label.to_string(),
                value: value.to_string(),
            });
            return;
        };

        match spec.slot {
            Slot::Text(get) => *get(&mut self.record) = value.to_string(),
            Slot::Count(get) => match coerce::parse_count(spec.field, value) {
                Ok(v) => *get(&mut self.record) = v,
                Err(e) => {
                    tracing::warn!(field = spec.field, raw = value, "field conversion failed");
                    *get(&mut self.record) = 0;
                    self.warnings.push(e);
                }
            },
            Slot::Temperature => {
                let (kelvin, celsius, err) = coerce::parse_dual_temperature(spec.field, value);
                match err {
                    None => {
                        self.record.temperature_k = kelvin;
                        self.record.temperature_c = celsius;
                    }
                    Some(e) => {
                        // A failed temperature line invalidates both
                        // components, whichever side parsed.
                        tracing::warn!(field = spec.field, raw = value, tags = %e.tags, "field conversion failed");
                        self.record.temperature_k = 0.0;
                        self.record.temperature_c = 0.0;
                        self.warnings.push(e);
                    }
                }
            }
        }
    }
}

/// Read one complete readout block from the transport.
///
/// Drives a [`LineScanner`] through the state machine until the closing
/// marker, stamps the record with the acquisition instant, and returns the
/// [`Readout`]. No further lines are pulled after the block closes, even if
/// the adapter keeps transmitting.
///
/// Fails with [`Error::Frame`] if the stream ends while the block is still
/// open (or before it ever opens); a transport timeout or loss propagates
/// unchanged. In every failure case the partial record is discarded.
pub async fn read_readout(
    transport: &mut dyn Transport,
    config: &ReadoutConfig,
) -> Result<Readout> {
    let scan_config = ScanConfig {
        max_line_len: config.max_line_len,
        read_timeout: config.read_timeout,
    };
    let mut scanner = LineScanner::new(transport, scan_config);
    let mut parser = BlockParser::new(config.marker.as_str());

    while let Some(line) = scanner.next_line().await? {
        if parser.push_line(&line) == LineOutcome::Closed {
            let stamp = helpers::format_timestamp(Local::now());
            return Ok(parser.finish(stamp));
        }
    }

    Err(Error::Frame(
        "stream ended before the readout block completed".into(),
    ))
}
