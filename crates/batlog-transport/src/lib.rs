//! batlog-transport: physical transports for readout acquisition.
//!
//! Provides [`SerialTransport`], the [`Transport`](batlog_core::Transport)
//! implementation for the serial link to a battery readout adapter. Tests
//! use the scripted mock from `batlog-test-harness` instead.

mod serial;

pub use serial::{SerialTransport, DEFAULT_BAUD_RATE};
