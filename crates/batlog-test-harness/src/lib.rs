//! batlog-test-harness: deterministic test doubles for batlog.
//!
//! Provides [`MockTransport`], a scripted [`Transport`](batlog_core::Transport)
//! implementation that replays a pre-loaded byte feed. Protocol and CLI
//! tests use it to exercise line scanning, block parsing, and failure paths
//! without a serial port or real hardware.

mod mock_serial;

pub use mock_serial::MockTransport;
