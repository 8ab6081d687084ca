//! Transport trait for readout acquisition.
//!
//! The [`Transport`] trait abstracts over the physical link to the battery
//! readout adapter. An implementation exists for serial ports in
//! `batlog-transport`, and a scripted mock lives in `batlog-test-harness`
//! so the protocol layer can be tested without hardware.
//!
//! The readout protocol is push-only: the adapter streams a block of lines
//! and the host never transmits. The trait is therefore receive-oriented --
//! there is no send side to abstract.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport from a readout adapter.
///
/// Implementations handle buffering and error mapping at the physical
/// layer. Line framing and field semantics are handled by the protocol
/// layer that consumes this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Receive bytes from the adapter into the provided buffer.
    ///
    /// Returns the number of bytes actually read. `Ok(0)` means the
    /// underlying stream has ended and no further data will arrive. Waits
    /// up to `timeout` for data; returns
    /// [`Error::Timeout`](crate::error::Error::Timeout) if nothing arrives
    /// within the deadline.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport connection.
    ///
    /// Called once the readout block has been fully received. After
    /// `close()`, subsequent `receive()` calls should return
    /// [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
