//! Battery profiles: per-device-family wear thresholds.
//!
//! A profile associates a device serial prefix (devices are serialized as
//! `<prefix><unit>`, e.g. `1234.000017`) with the battery wear limits its
//! manufacturer documents. The history view uses the matched profile to
//! turn raw cycle counts and capacities into a health verdict.
//!
//! Profiles live in a single JSON array file; the field names are the
//! persisted layout (including its historical spelling of
//! `assosiatedevsnprefix`, which is kept for compatibility).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use batlog_core::error::{Error, Result};
use batlog_core::record::BatteryRecord;

/// Wear thresholds for batteries attached to one device family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryProfile {
    /// Human-readable device name, e.g. `"Demo Device"`.
    #[serde(rename = "associateddevicename")]
    pub associated_device_name: String,
    /// Device serial prefix this profile applies to, e.g. `"1234."`.
    #[serde(rename = "assosiatedevsnprefix")]
    pub associate_dev_sn_prefix: String,
    /// Maximum cycle count per the device manufacturer.
    #[serde(rename = "maxcycles")]
    pub max_cycles: i32,
    /// Minimum acceptable full capacity as a fraction of design capacity.
    #[serde(rename = "mincapacityfactor")]
    pub min_capacity_factor: f64,
    /// Optional cycle count that triggers a warning verdict.
    #[serde(rename = "warncycles")]
    pub warn_cycles: i32,
    /// Optional capacity fraction that triggers a warning verdict.
    #[serde(rename = "warncapacityfactor")]
    pub warn_capacity_factor: f64,
    /// Optional image file for the associated device.
    #[serde(rename = "imagefiledevice")]
    pub image_file_device: String,
    /// Optional image file for the battery.
    #[serde(rename = "imagefilebattery")]
    pub image_file_battery: String,
}

/// Health verdict for a reading judged against a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Within all thresholds.
    Good,
    /// Past a warn threshold but still serviceable.
    Warning,
    /// Past a manufacturer limit; the battery should be replaced.
    Replace,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Good => write!(f, "good"),
            HealthStatus::Warning => write!(f, "worn"),
            HealthStatus::Replace => write!(f, "replace"),
        }
    }
}

impl BatteryProfile {
    /// Whether this profile applies to the given device serial.
    pub fn matches(&self, dev_serial: &str) -> bool {
        !self.associate_dev_sn_prefix.is_empty()
            && dev_serial.starts_with(&self.associate_dev_sn_prefix)
    }

    /// Judge a reading against this profile's thresholds.
    ///
    /// Thresholds left at zero are not evaluated, so a sparse profile
    /// never flags a healthy battery.
    pub fn health(&self, record: &BatteryRecord) -> HealthStatus {
        let full = record.full_capacity as f64;
        let design = record.design_capacity as f64;

        if self.max_cycles > 0 && record.cycle_count > self.max_cycles {
            return HealthStatus::Replace;
        }
        if self.min_capacity_factor > 0.0 && design > 0.0 && full < design * self.min_capacity_factor
        {
            return HealthStatus::Replace;
        }
        if self.warn_cycles > 0 && record.cycle_count >= self.warn_cycles {
            return HealthStatus::Warning;
        }
        if self.warn_capacity_factor > 0.0
            && design > 0.0
            && full <= design * self.warn_capacity_factor
        {
            return HealthStatus::Warning;
        }
        HealthStatus::Good
    }

    /// The first-run demo profile.
    pub fn demo() -> Self {
        BatteryProfile {
            associated_device_name: "Demo Device".into(),
            associate_dev_sn_prefix: "1234.".into(),
            max_cycles: 200,
            min_capacity_factor: 0.75,
            warn_cycles: 178,
            warn_capacity_factor: 0.8,
            image_file_device: "demodev.png".into(),
            image_file_battery: "demobat.png".into(),
        }
    }
}

/// Load the profile array from `path`.
pub fn load_profiles(path: &Path) -> Result<Vec<BatteryProfile>> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Store(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| Error::Store(format!("cannot parse {}: {}", path.display(), e)))
}

/// Save the profile array to `path`.
pub fn save_profiles(path: &Path, profiles: &[BatteryProfile]) -> Result<()> {
    let json = serde_json::to_vec_pretty(profiles)
        .map_err(|e| Error::Store(format!("cannot serialize profiles: {e}")))?;
    fs::write(path, json)
        .map_err(|e| Error::Store(format!("cannot write {}: {}", path.display(), e)))
}

/// Find the profile matching a device serial, if any.
pub fn match_profile<'a>(
    profiles: &'a [BatteryProfile],
    dev_serial: &str,
) -> Option<&'a BatteryProfile> {
    profiles.iter().find(|p| p.matches(dev_serial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn reading(cycles: i32, full: i32, design: i32) -> BatteryRecord {
        BatteryRecord {
            cycle_count: cycles,
            full_capacity: full,
            design_capacity: design,
            ..Default::default()
        }
    }

    #[test]
    fn prefix_match() {
        let profile = BatteryProfile::demo();
        assert!(profile.matches("1234.000017"));
        assert!(!profile.matches("9999.000017"));
        assert!(!profile.matches(""));
    }

    #[test]
    fn empty_prefix_never_matches() {
        let profile = BatteryProfile::default();
        assert!(!profile.matches("anything"));
    }

    #[test]
    fn match_profile_picks_first_hit() {
        let mut other = BatteryProfile::demo();
        other.associate_dev_sn_prefix = "5678.".into();
        other.associated_device_name = "Other Device".into();
        let profiles = vec![other, BatteryProfile::demo()];

        let hit = match_profile(&profiles, "1234.42").unwrap();
        assert_eq!(hit.associated_device_name, "Demo Device");
        assert!(match_profile(&profiles, "0000.1").is_none());
    }

    #[test]
    fn health_good_within_thresholds() {
        let profile = BatteryProfile::demo();
        assert_eq!(profile.health(&reading(10, 6990, 7200)), HealthStatus::Good);
    }

    #[test]
    fn health_warns_on_cycles() {
        let profile = BatteryProfile::demo();
        assert_eq!(
            profile.health(&reading(178, 6990, 7200)),
            HealthStatus::Warning
        );
    }

    #[test]
    fn health_warns_on_capacity_fade() {
        let profile = BatteryProfile::demo();
        // 0.8 * 7200 = 5760.
        assert_eq!(
            profile.health(&reading(10, 5700, 7200)),
            HealthStatus::Warning
        );
    }

    #[test]
    fn health_replace_past_max_cycles() {
        let profile = BatteryProfile::demo();
        assert_eq!(
            profile.health(&reading(201, 6990, 7200)),
            HealthStatus::Replace
        );
    }

    #[test]
    fn health_replace_below_capacity_floor() {
        let profile = BatteryProfile::demo();
        // 0.75 * 7200 = 5400.
        assert_eq!(
            profile.health(&reading(10, 5300, 7200)),
            HealthStatus::Replace
        );
    }

    #[test]
    fn sparse_profile_stays_good() {
        let profile = BatteryProfile::default();
        assert_eq!(profile.health(&reading(500, 100, 7200)), HealthStatus::Good);
    }

    #[test]
    fn profiles_round_trip_with_persisted_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("BatteryProfiles.json");
        let profiles = vec![BatteryProfile::demo()];
        save_profiles(&path, &profiles).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("assosiatedevsnprefix"));
        assert!(text.contains("mincapacityfactor"));

        let back = load_profiles(&path).unwrap();
        assert_eq!(back, profiles);
    }

    #[test]
    fn missing_fields_default_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("BatteryProfiles.json");
        fs::write(&path, r#"[{"associateddevicename": "Bare Device"}]"#).unwrap();

        let profiles = load_profiles(&path).unwrap();
        assert_eq!(profiles[0].associated_device_name, "Bare Device");
        assert_eq!(profiles[0].max_cycles, 0);
        assert_eq!(profiles[0].min_capacity_factor, 0.0);
    }
}
