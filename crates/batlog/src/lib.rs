//! # batlog -- Battery Pack Telemetry Logging
//!
//! `batlog` acquires structured telemetry from smart battery packs over a
//! serial link, using the ASCII line-oriented SMBus readout protocol, and
//! persists each reading as a timestamped record tied to the host device
//! the pack was attached to.
//!
//! ## Quick Start
//!
//! Add `batlog` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! batlog = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! Read one block from an adapter and store it:
//!
//! ```no_run
//! use batlog::{read_readout, ReadoutConfig, RecordStore, SerialTransport, Transport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut transport = SerialTransport::open("/dev/ttyUSB0", 9600).await?;
//!     let readout = read_readout(&mut transport, &ReadoutConfig::default()).await?;
//!     transport.close().await?;
//!
//!     for warning in &readout.warnings {
//!         eprintln!("{warning}");
//!     }
//!
//!     let store = RecordStore::open("./data/db")?;
//!     store.write(&readout.record)?;
//!     println!(
//!         "Stored reading for \"{} {}\"",
//!         readout.record.name, readout.record.serial_number
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized as a workspace of focused crates:
//!
//! | Crate                 | Purpose                                         |
//! |-----------------------|-------------------------------------------------|
//! | `batlog-core`         | [`BatteryRecord`], [`Transport`], errors        |
//! | `batlog-transport`    | Serial transport implementation                 |
//! | `batlog-protocol`     | Line scanner, value coercion, block parser      |
//! | `batlog-store`        | Per-battery JSON record store, profiles         |
//! | `batlog-test-harness` | Scripted mock transport for tests               |
//! | **`batlog`**          | This facade crate -- re-exports everything      |
//!
//! ## Readout model
//!
//! One reading arrives as a block of `LABEL: value` lines framed by a
//! fixed 35-dash boundary marker, each line CR-terminated. The parser is
//! tolerant inside the block (unknown labels and unparseable values are
//! collected as diagnostics, fields default to zero) and strict about
//! framing (a stream that ends or goes quiet before the closing marker
//! aborts the readout with no record).
//!
//! ## Identity and device association
//!
//! `name + serial` identifies a physical pack across its whole service
//! life. The host device it is attached to is remembered opportunistically:
//! [`RecordStore::resolve_device`] returns the newest recorded association,
//! and a `None` result just means the caller should ask.

pub use batlog_core::*;

pub use batlog_protocol::{
    parse_count, parse_dual_temperature, parse_measure, read_readout, strip_units, BlockParser,
    ConversionError, LineOutcome, LineScanner, Readout, ReadoutConfig, ScanConfig, BLOCK_MARKER,
};

pub use batlog_store::{
    load_profiles, match_profile, save_profiles, BatteryProfile, HealthStatus, RecordStore,
};

pub use batlog_transport::{SerialTransport, DEFAULT_BAUD_RATE};
