//! Read one battery block from a serial readout adapter and store it.
//!
//! # Requirements
//!
//! - An SMBus readout adapter on a serial port, with a pack attached
//! - The serial port path adjusted for your system (e.g., `/dev/ttyUSB0`
//!   on Linux, `COM4` on Windows)
//!
//! # Usage
//!
//! ```sh
//! cargo run -p batlog --example read_once
//! ```

use batlog::{read_readout, ReadoutConfig, RecordStore, SerialTransport, Transport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Adjust this to match your system's serial port.
    let serial_port = "/dev/ttyUSB0";

    println!("Waiting for data ({serial_port}) ...");

    let mut transport = SerialTransport::open(serial_port, batlog::DEFAULT_BAUD_RATE).await?;
    let readout = read_readout(&mut transport, &ReadoutConfig::default()).await?;
    transport.close().await?;

    println!("OK!");

    if !readout.unrecognized.is_empty() {
        println!("Warning! The following entries were discarded (unknown data):");
        for field in &readout.unrecognized {
            println!("  {field}");
        }
    }
    for warning in &readout.warnings {
        println!("Warning! {warning}");
    }

    let record = &readout.record;
    println!(
        "Data from \"{} {}\" extracted successfully",
        record.name, record.serial_number
    );
    println!("  voltage: {} mV ({} mV measured)", record.voltage, record.voltage_measured);
    println!("  temperature: {} K ({} C)", record.temperature_k, record.temperature_c);
    println!("  charge: {} % relative, {} % absolute", record.relative_charge, record.absolute_charge);
    println!("  capacity: {} / {} mAh (design {})", record.remaining_capacity, record.full_capacity, record.design_capacity);

    let store = RecordStore::open("./data/db")?;
    store.write(record)?;
    println!("Saved reading {} under \"{}\"", record.timestamp, record.identity());

    Ok(())
}
