//! Serial port transport for battery readout acquisition.
//!
//! This module provides [`SerialTransport`], which implements the
//! [`Transport`] trait for USB virtual COM ports and physical RS-232
//! connections to a battery readout adapter.
//!
//! The SMBus readout adapters this crate targets all present the same line
//! settings: 9600 baud, 8 data bits, 1 stop bit, no parity, no flow
//! control. Only the baud rate is configurable; everything else uses those
//! fixed settings.
//!
//! # Example
//!
//! ```no_run
//! use batlog_transport::SerialTransport;
//! use batlog_core::Transport;
//! use std::time::Duration;
//!
//! # async fn example() -> batlog_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0", 9600).await?;
//!
//! // Wait up to 30 seconds for the adapter to start streaming.
//! let mut buf = [0u8; 256];
//! let n = transport.receive(&mut buf, Duration::from_secs(30)).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio_serial::SerialPortBuilderExt;

use batlog_core::error::{Error, Result};
use batlog_core::transport::Transport;

/// The baud rate the readout adapters ship with.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Serial port transport for readout acquisition.
///
/// Implements the [`Transport`] trait for USB virtual COM ports and
/// physical RS-232 connections. The port is closed on [`close`](Transport::close)
/// or when the transport is dropped.
pub struct SerialTransport {
    /// The underlying serial port stream; `None` once closed.
    port: Option<tokio_serial::SerialStream>,
    /// Port name for logging/debugging.
    port_name: String,
}

impl SerialTransport {
    /// Open a serial port at the given baud rate with 8N1 settings.
    ///
    /// # Arguments
    ///
    /// * `port` - Serial port path (e.g. `/dev/ttyUSB0` on Linux, `COM4`
    ///   on Windows)
    /// * `baud_rate` - Baud rate; readout adapters use
    ///   [`DEFAULT_BAUD_RATE`]
    pub async fn open(port: &str, baud_rate: u32) -> Result<Self> {
        tracing::debug!(port = %port, baud_rate, "Opening serial port");

        let stream = tokio_serial::new(port, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                tracing::error!(port = %port, error = %e, "Failed to open serial port");
                Error::Transport(format!("failed to open serial port {}: {}", port, e))
            })?;

        tracing::info!(port = %port, baud_rate, "Serial port opened");

        Ok(Self {
            port: Some(stream),
            port_name: port.to_string(),
        })
    }

    /// Get the name of the serial port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(
            port = %self.port_name,
            buf_len = buf.len(),
            timeout_ms = timeout.as_millis(),
            "Waiting for readout data"
        );

        match tokio::time::timeout(timeout, port.read(buf)).await {
            Ok(Ok(n)) => {
                tracing::trace!(port = %self.port_name, bytes = n, "Received readout data");
                Ok(n)
            }
            Ok(Err(e)) => {
                tracing::error!(port = %self.port_name, error = %e, "Failed to receive data");
                if e.kind() == std::io::ErrorKind::BrokenPipe
                    || e.kind() == std::io::ErrorKind::NotConnected
                {
                    Err(Error::ConnectionLost)
                } else {
                    Err(Error::Io(e))
                }
            }
            Err(_) => {
                tracing::trace!(
                    port = %self.port_name,
                    timeout_ms = timeout.as_millis(),
                    "Timeout waiting for readout data"
                );
                Err(Error::Timeout)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(port) = self.port.take() {
            tracing::debug!(port = %self.port_name, "Closing serial port");
            drop(port);
            tracing::info!(port = %self.port_name, "Serial port closed");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.port.is_some() {
            tracing::debug!(port = %self.port_name, "SerialTransport dropped, closing port");
        }
    }
}
