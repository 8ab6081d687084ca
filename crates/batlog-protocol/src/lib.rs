//! batlog-protocol: the SMBus readout protocol engine.
//!
//! The readout adapter frames one battery reading as a block of ASCII
//! `LABEL: value` lines between two occurrences of a 35-dash boundary
//! marker, each line terminated with a bare CR:
//!
//! ```text
//! -----------------------------------
//! MANUFACTURER: RRC
//! BATTERY NAME: RRC2020
//! VOLTAGE: 11155 mV
//! TEMPERATURE: 305.3 K (32.0 C)
//! -----------------------------------
//! ```
//!
//! This crate turns that byte stream into a typed
//! [`BatteryRecord`](batlog_core::BatteryRecord):
//!
//! - [`scan`] -- CR line scanner over a [`Transport`](batlog_core::Transport)
//! - [`coerce`] -- unit stripping and numeric/dual-temperature decoding
//! - [`readout`] -- the block state machine and the [`read_readout`] driver
//!
//! Unknown labels and unparseable values are collected and reported, never
//! fatal; a stream that ends or goes quiet before the block closes is fatal
//! and yields no record.

pub mod coerce;
mod fields;
pub mod readout;
pub mod scan;

pub use coerce::{parse_count, parse_dual_temperature, parse_measure, strip_units, ConversionError};
pub use readout::{read_readout, BlockParser, LineOutcome, Readout, ReadoutConfig, BLOCK_MARKER};
pub use scan::{split_line, LineScanner, ScanConfig, ScanResult, DEFAULT_MAX_LINE_LEN};
