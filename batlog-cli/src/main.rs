// batlog command-line application -- acquire battery pack readings over a
// serial readout adapter, store them per battery, and review a battery's
// history against its device's wear profile.
//
// Usage:
//   batlog init
//   batlog read
//   batlog read --device-sn 1234.000017
//   batlog read --port /dev/ttyACM0 --read-only
//   batlog history
//   batlog history "RRC2020#0042"
//   batlog resolve "RRC2020#0042"
//   batlog demo --device-sn 1234.000017

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use rand::Rng;
use tracing_subscriber::EnvFilter;

use batlog::{
    load_profiles, match_profile, read_readout, timestamp_day, BatteryProfile, BatteryRecord,
    HealthStatus, Readout, ReadoutConfig, RecordStore, SerialTransport, Transport,
    DEFAULT_BAUD_RATE, DEV_SN_UNSET,
};

mod config;

use config::{DataPaths, GeneralConfiguration};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Battery readout acquisition and history tool.
#[derive(Parser)]
#[command(name = "batlog", version, about)]
struct Cli {
    /// Data directory holding the record store, configuration, and
    /// battery profiles.
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Override the configured serial port for this invocation.
    #[arg(long)]
    port: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the data directory layout, a default configuration, and a
    /// demo battery profile.
    Init,

    /// Wait for one readout block from the adapter and store it.
    Read {
        /// Serial number of the host device the pack is attached to.
        #[arg(long)]
        device_sn: Option<String>,

        /// Don't prompt when no device association is known; record the
        /// reading without one.
        #[arg(long)]
        no_prompt: bool,

        /// Parse and display the reading without writing to the store.
        #[arg(long)]
        read_only: bool,
    },

    /// Show the stored history for a battery, or list known batteries.
    History {
        /// Battery identity (name + serial, e.g. "RRC2020#0042").
        identity: Option<String>,
    },

    /// Show the remembered device association for a battery.
    Resolve {
        /// Battery identity (name + serial).
        identity: String,
    },

    /// Store a generated demo reading (no hardware required).
    Demo {
        /// Serial number of the host device for the demo reading.
        #[arg(long)]
        device_sn: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let paths = DataPaths::new(&cli.data_dir);

    match cli.command {
        Command::Init => cmd_init(&paths),
        Command::Read {
            device_sn,
            no_prompt,
            read_only,
        } => cmd_read(&paths, cli.port, device_sn, no_prompt, read_only).await,
        Command::History { identity } => cmd_history(&paths, identity),
        Command::Resolve { identity } => cmd_resolve(&paths, &identity),
        Command::Demo { device_sn } => cmd_demo(&paths, device_sn),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_init(paths: &DataPaths) -> Result<()> {
    config::bootstrap(paths)?;
    println!("Initialized data directory at {}", paths.root().display());
    Ok(())
}

async fn cmd_read(
    paths: &DataPaths,
    port_override: Option<String>,
    device_sn: Option<String>,
    no_prompt: bool,
    read_only: bool,
) -> Result<()> {
    let config = GeneralConfiguration::load_or_init(paths)?;
    let port = port_override.unwrap_or(config.serial_port);

    print!("Waiting for data ({port}) ... ");
    io::stdout().flush().ok();

    let mut transport = SerialTransport::open(&port, DEFAULT_BAUD_RATE)
        .await
        .with_context(|| format!("cannot open serial port {port}"))?;
    let result = read_readout(&mut transport, &ReadoutConfig::default()).await;
    transport.close().await.ok();

    let mut readout = result.context("readout failed")?;
    println!("OK!");
    report_diagnostics(&readout);

    let record = &mut readout.record;
    if record.name.is_empty() && record.serial_number.is_empty() {
        bail!("readout block carried no battery identity; nothing to store");
    }

    let store = RecordStore::open(paths.db_dir())?;
    let identity = record.identity();
    let remembered = store.resolve_device(&identity)?;

    record.dev_serial_number = match (device_sn, remembered) {
        (Some(given), Some(known)) => {
            if given != known {
                tracing::warn!(stored = %known, given = %given, "device association mismatch");
                println!("Note: battery was last seen attached to \"{known}\", now \"{given}\"");
            }
            given
        }
        (Some(given), None) => given,
        (None, Some(known)) => {
            println!("Using remembered device association \"{known}\"");
            known
        }
        (None, None) if no_prompt => DEV_SN_UNSET.to_string(),
        (None, None) => prompt_device_sn()?,
    };

    println!(
        "Data from \"{} {}\" extracted successfully",
        record.name, record.serial_number
    );

    if read_only {
        print_summary(paths, record);
        return Ok(());
    }

    store.write(record)?;
    println!("Saved reading {} under \"{identity}\"", record.timestamp);
    print_summary(paths, record);
    Ok(())
}

fn cmd_history(paths: &DataPaths, identity: Option<String>) -> Result<()> {
    let store = RecordStore::open(paths.db_dir())?;

    let Some(identity) = identity else {
        let identities = store.identities()?;
        if identities.is_empty() {
            println!("No batteries on file.");
            return Ok(());
        }
        println!("Batteries on file:");
        for identity in identities {
            let count = store.read_all(&identity)?.len();
            println!("  {identity}  ({count} reading(s))");
        }
        return Ok(());
    };

    let mut records = store.read_all(&identity)?;
    if records.is_empty() {
        println!("No readings on file for \"{identity}\".");
        return Ok(());
    }
    records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let profiles = load_profiles_if_present(paths);
    let device = store.resolve_device(&identity)?;
    let profile = device
        .as_deref()
        .and_then(|dev| match_profile(&profiles, dev));

    match (&device, profile) {
        (Some(dev), Some(p)) => {
            println!("{identity} @ {} ({dev})", p.associated_device_name)
        }
        (Some(dev), None) => println!("{identity} @ {dev}"),
        (None, _) => println!("{identity} (no device association)"),
    }
    println!("{} measurement(s)", records.len());
    println!();
    println!(
        "{:<12} {:>8} {:>10} {:>8} {:>9}  {}",
        "date", "cycles", "full mAh", "charge", "volt mV", "health"
    );
    for record in &records {
        let day = timestamp_day(&record.timestamp).unwrap_or_else(|| record.timestamp.clone());
        let health = profile
            .map(|p| p.health(record).to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:>8} {:>10} {:>7}% {:>9}  {}",
            day,
            record.cycle_count,
            record.full_capacity,
            record.relative_charge,
            record.voltage,
            health
        );
    }
    Ok(())
}

fn cmd_resolve(paths: &DataPaths, identity: &str) -> Result<()> {
    let store = RecordStore::open(paths.db_dir())?;
    match store.resolve_device(identity)? {
        Some(device) => {
            let profiles = load_profiles_if_present(paths);
            match match_profile(&profiles, &device) {
                Some(profile) => println!(
                    "{identity} was last attached to \"{device}\" ({})",
                    profile.associated_device_name
                ),
                None => println!("{identity} was last attached to \"{device}\""),
            }
        }
        None => println!("No device association on file for \"{identity}\"."),
    }
    Ok(())
}

fn cmd_demo(paths: &DataPaths, device_sn: Option<String>) -> Result<()> {
    if !paths.config_path().exists() {
        config::bootstrap(paths)?;
    }

    let record = demo_record(device_sn);
    let store = RecordStore::open(paths.db_dir())?;
    store.write(&record)?;
    println!(
        "Saved demo reading {} under \"{}\"",
        record.timestamp,
        record.identity()
    );
    print_summary(paths, &record);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn report_diagnostics(readout: &Readout) {
    if !readout.unrecognized.is_empty() {
        println!("Warning! The following entries were discarded (unknown data):");
        for field in &readout.unrecognized {
            println!("  {field}");
        }
    }
    for warning in &readout.warnings {
        println!("Warning! {warning}");
    }
}

fn print_summary(paths: &DataPaths, record: &BatteryRecord) {
    println!(
        "  device:      {}",
        if record.has_device() {
            record.dev_serial_number.as_str()
        } else {
            "<none>"
        }
    );
    println!(
        "  voltage:     {} mV ({} mV measured)",
        record.voltage, record.voltage_measured
    );
    println!(
        "  temperature: {} K ({} C)",
        record.temperature_k, record.temperature_c
    );
    println!(
        "  charge:      {}% relative, {}% absolute",
        record.relative_charge, record.absolute_charge
    );
    println!(
        "  capacity:    {} / {} mAh (design {} mAh)",
        record.remaining_capacity, record.full_capacity, record.design_capacity
    );
    println!("  cycles:      {}", record.cycle_count);

    if record.has_device() {
        let profiles = load_profiles_if_present(paths);
        if let Some(profile) = match_profile(&profiles, &record.dev_serial_number) {
            let health = profile.health(record);
            println!(
                "  health:      {health} (profile \"{}\")",
                profile.associated_device_name
            );
            if health != HealthStatus::Good {
                println!(
                    "               limits: {} cycles max, {:.0}% capacity floor",
                    profile.max_cycles,
                    profile.min_capacity_factor * 100.0
                );
            }
        }
    }
}

fn load_profiles_if_present(paths: &DataPaths) -> Vec<BatteryProfile> {
    let path = paths.profiles_path();
    if !path.exists() {
        return Vec::new();
    }
    match load_profiles(&path) {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!(error = %e, "cannot load battery profiles");
            Vec::new()
        }
    }
}

fn prompt_device_sn() -> Result<String> {
    print!("Attach battery to device :> ");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("cannot read device serial from stdin")?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(DEV_SN_UNSET.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Build a plausible reading without hardware, in the shape a healthy
/// mid-discharge pack reports.
fn demo_record(device_sn: Option<String>) -> BatteryRecord {
    let now = Local::now();
    let dev_serial_number = device_sn
        .unwrap_or_else(|| format!("1234.{:06}", rand::thread_rng().gen_range(0..1_000_000)));

    BatteryRecord {
        manufacturer: "RND".into(),
        name: "RND 1420".into(),
        chemistry: "LION".into(),
        specification: "ID3.1 Vs0 IPs0".into(),
        serial_number: "#0000".into(),
        mfg_date: format!("{} / {} / {}", now.year() - 2, now.month(), now.day()),
        voltage: 11155,
        voltage_measured: 11202,
        current: -21,
        temperature_k: 305.3,
        temperature_c: 32.0,
        ntc: 275,
        charging_voltage: 12600,
        charging_current: 4830,
        relative_charge: 45,
        remaining_capacity: 5900,
        full_capacity: 6990,
        absolute_charge: 44,
        design_capacity: 7200,
        design_voltage: 10800,
        state_register: "0080 hex".into(),
        mode_register: "0001 hex".into(),
        cycle_count: 0,
        max_error: 1,
        time_alarm: 10,
        time_to_full: 65535,
        time_to_empty: 65535,
        capacity_alarm: 690,
        battery_uses_pec: "Yes".into(),
        opt_mfg_2f: "0014 hex".into(),
        opt_mfg_3c: "0000 hex".into(),
        opt_mfg_3d: "0e85 hex".into(),
        opt_mfg_3e: "0e86 hex".into(),
        opt_mfg_3f: "0e87 hex".into(),
        dev_serial_number,
        timestamp: batlog::format_timestamp(now),
    }
}
