//! The battery reading data model.
//!
//! A [`BatteryRecord`] is one reading from one battery pack at one instant.
//! It is built up field-by-field while a readout block is scanned, stamped
//! with the acquisition time when the block closes, and from then on
//! treated as an immutable value: corrections arrive as new timestamped
//! records under the same identity, never as in-place edits.
//!
//! The serde field names match the persisted JSON layout exactly, so
//! records written by earlier tooling read back without migration.

use serde::{Deserialize, Serialize};

/// Placeholder device serial meaning "no host device association".
///
/// Records carrying this value (or an empty string) are skipped when the
/// store resolves which device a battery was last attached to.
pub const DEV_SN_UNSET: &str = "(none)";

/// One telemetry reading from a battery pack.
///
/// Integer measurements are in the units the readout protocol reports
/// (mV, mA, mAh, %, min, ohm); the temperature pair is decoded from the
/// single dual-unit `TEMPERATURE` field. Fields absent from the scanned
/// block keep their zero values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryRecord {
    /// Pack manufacturer, e.g. `"RRC"`.
    pub manufacturer: String,
    /// Pack model name, e.g. `"RRC2020"`. Part of the identity key.
    pub name: String,
    /// Cell chemistry, e.g. `"LION"`.
    pub chemistry: String,
    /// SMBus specification string, e.g. `"ID3.1 Vs0 IPs0"`.
    pub specification: String,
    /// Pack serial number as reported, e.g. `"#0000"`. Part of the
    /// identity key.
    #[serde(rename = "serial")]
    pub serial_number: String,
    /// Manufacture date in the pack's own `"YEAR / MONTH / DAY"` form.
    #[serde(rename = "mfgdate")]
    pub mfg_date: String,
    /// Reported pack voltage in mV.
    pub voltage: i32,
    /// Independently measured pack voltage in mV.
    #[serde(rename = "voltagemeasured")]
    pub voltage_measured: i32,
    /// Pack current in mA; negative while discharging.
    pub current: i32,
    /// Pack temperature in Kelvin.
    #[serde(rename = "kelvin")]
    pub temperature_k: f64,
    /// Pack temperature in Celsius, from the same dual-unit field.
    #[serde(rename = "celsius")]
    pub temperature_c: f64,
    /// NTC thermistor reading in ohm.
    pub ntc: i32,
    /// Charger-requested voltage in mV.
    #[serde(rename = "chargingvoltage")]
    pub charging_voltage: i32,
    /// Charger-requested current in mA.
    #[serde(rename = "chargingcurrent")]
    pub charging_current: i32,
    /// Relative state of charge in %.
    #[serde(rename = "relativecharge")]
    pub relative_charge: i32,
    /// Remaining capacity in mAh.
    #[serde(rename = "remainingcapacity")]
    pub remaining_capacity: i32,
    /// Last measured full-charge capacity in mAh.
    #[serde(rename = "fullcapacity")]
    pub full_capacity: i32,
    /// Absolute state of charge in %.
    #[serde(rename = "absolutecharge")]
    pub absolute_charge: i32,
    /// Design capacity in mAh.
    #[serde(rename = "designcapacity")]
    pub design_capacity: i32,
    /// Design voltage in mV.
    #[serde(rename = "designvoltage")]
    pub design_voltage: i32,
    /// Battery state register, raw hex string, e.g. `"00e0 hex"`.
    #[serde(rename = "stateregister")]
    pub state_register: String,
    /// Battery mode register, raw hex string.
    #[serde(rename = "moderegister")]
    pub mode_register: String,
    /// Charge/discharge cycle count.
    #[serde(rename = "cyclecount")]
    pub cycle_count: i32,
    /// Expected capacity measurement error in %.
    #[serde(rename = "maxerror")]
    pub max_error: i32,
    /// Remaining-time alarm threshold in min.
    #[serde(rename = "timealarm")]
    pub time_alarm: i32,
    /// Predicted time to full charge in min.
    #[serde(rename = "timetofull")]
    pub time_to_full: i32,
    /// Predicted time to empty in min.
    #[serde(rename = "timetoempty")]
    pub time_to_empty: i32,
    /// Remaining-capacity alarm threshold in mAh.
    #[serde(rename = "capacityalarm")]
    pub capacity_alarm: i32,
    /// Whether the pack uses SMBus packet error checking; free text as
    /// reported (`"Yes"` / `"No"`).
    #[serde(rename = "batteryusespec")]
    pub battery_uses_pec: String,
    /// Optional manufacturer register 0x2f, raw hex string.
    #[serde(rename = "optmfg2f")]
    pub opt_mfg_2f: String,
    /// Optional manufacturer register 0x3c, raw hex string.
    #[serde(rename = "optmfg3c")]
    pub opt_mfg_3c: String,
    /// Optional manufacturer register 0x3d, raw hex string.
    #[serde(rename = "optmfg3d")]
    pub opt_mfg_3d: String,
    /// Optional manufacturer register 0x3e, raw hex string.
    #[serde(rename = "optmfg3e")]
    pub opt_mfg_3e: String,
    /// Optional manufacturer register 0x3f, raw hex string.
    #[serde(rename = "optmfg3f")]
    pub opt_mfg_3f: String,
    /// Serial number of the host device the pack is attached to.
    ///
    /// A weak back-reference only: the same pack may be observed on
    /// different devices over time, and [`DEV_SN_UNSET`] or an empty
    /// string means no association was recorded for this reading.
    #[serde(rename = "devserialnumber")]
    pub dev_serial_number: String,
    /// Acquisition instant in the fixed-width sortable `%Y%m%d%H%M%S`
    /// encoding. Doubles as the per-identity store key.
    pub timestamp: String,
}

impl BatteryRecord {
    /// The stable identity key for this pack: model name + serial number.
    ///
    /// Unique per physical battery and used for all store lookups. The
    /// device serial is deliberately not part of the key -- packs survive
    /// device swaps.
    pub fn identity(&self) -> String {
        format!("{}{}", self.name, self.serial_number)
    }

    /// Whether this reading carries a usable host-device association.
    pub fn has_device(&self) -> bool {
        !self.dev_serial_number.is_empty() && self.dev_serial_number != DEV_SN_UNSET
    }
}

/// A scanned line whose label is not in the field dispatch table.
///
/// Collected for diagnostics only -- unrecognized fields are reported once
/// the readout completes and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedField {
    /// The label left of the first `:`, trimmed.
    pub label: String,
    /// The raw value right of the first `:`, trimmed.
    pub value: String,
}

impl std::fmt::Display for UnrecognizedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unspecified: {} (= {})", self.label, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_name_plus_serial() {
        let record = BatteryRecord {
            name: "RRC2020".into(),
            serial_number: "#0042".into(),
            ..Default::default()
        };
        assert_eq!(record.identity(), "RRC2020#0042");
    }

    #[test]
    fn default_record_is_all_zeroes() {
        let record = BatteryRecord::default();
        assert_eq!(record.voltage, 0);
        assert_eq!(record.cycle_count, 0);
        assert_eq!(record.temperature_k, 0.0);
        assert!(record.manufacturer.is_empty());
        assert!(record.timestamp.is_empty());
    }

    #[test]
    fn has_device_rejects_sentinel_and_empty() {
        let mut record = BatteryRecord::default();
        assert!(!record.has_device());

        record.dev_serial_number = DEV_SN_UNSET.into();
        assert!(!record.has_device());

        record.dev_serial_number = "1234.5678".into();
        assert!(record.has_device());
    }

    #[test]
    fn serde_field_names_match_persisted_layout() {
        let record = BatteryRecord {
            manufacturer: "RRC".into(),
            name: "RRC2020".into(),
            serial_number: "#0000".into(),
            voltage: 11155,
            temperature_k: 305.3,
            temperature_c: 32.0,
            dev_serial_number: "1234.99".into(),
            timestamp: "20260801120000".into(),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["manufacturer"], "RRC");
        assert_eq!(json["serial"], "#0000");
        assert_eq!(json["voltage"], 11155);
        assert_eq!(json["kelvin"], 305.3);
        assert_eq!(json["celsius"], 32.0);
        assert_eq!(json["devserialnumber"], "1234.99");
        assert_eq!(json["timestamp"], "20260801120000");
        // Renames, not additions: the Rust-side names must be absent.
        assert!(json.get("serial_number").is_none());
        assert!(json.get("temperature_k").is_none());
    }

    #[test]
    fn serde_round_trip() {
        let record = BatteryRecord {
            name: "RND 1420".into(),
            serial_number: "#0007".into(),
            current: -21,
            full_capacity: 6990,
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: BatteryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn unrecognized_field_display() {
        let field = UnrecognizedField {
            label: "FIRMWARE REV".into(),
            value: "1.07".into(),
        };
        assert_eq!(field.to_string(), "Unspecified: FIRMWARE REV (= 1.07)");
    }
}
