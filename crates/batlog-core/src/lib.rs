//! batlog-core: Core traits, types, and error definitions for batlog.
//!
//! This crate defines the transport-agnostic abstractions the rest of the
//! workspace builds on. Applications that only consume stored readings can
//! depend on these types without pulling in the serial or protocol crates.
//!
//! # Key types
//!
//! - [`BatteryRecord`] -- one typed reading from one battery pack
//! - [`Transport`] -- byte-level receive channel from a readout adapter
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod helpers;
pub mod record;
pub mod transport;

// Re-export key types at crate root for ergonomic `use batlog_core::*`.
pub use error::{Error, Result};
pub use helpers::{format_timestamp, parse_timestamp, timestamp_day, TIMESTAMP_FORMAT};
pub use record::{BatteryRecord, UnrecognizedField, DEV_SN_UNSET};
pub use transport::Transport;
