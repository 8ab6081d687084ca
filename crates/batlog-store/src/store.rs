//! The per-battery record store.
//!
//! Readings are persisted as one JSON file per record, grouped in a
//! directory per battery identity:
//!
//! ```text
//! <root>/<name + serial>/<timestamp>.json
//! ```
//!
//! The store is append-oriented: records are never mutated after
//! acceptance, and a write with an identity + timestamp that already
//! exists silently replaces the earlier file (last write wins). There is
//! no locking -- callers that share a store across tasks must serialize
//! writes to the same identity themselves; the only atomicity provided is
//! one whole record per call, via a temp-file rename.

use std::fs;
use std::path::{Path, PathBuf};

use batlog_core::error::{Error, Result};
use batlog_core::record::BatteryRecord;

/// Directory-backed append log of [`BatteryRecord`]s, keyed by battery
/// identity.
#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| Error::Store(format!("cannot create store root {}: {}", root.display(), e)))?;
        Ok(RecordStore { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Append a record under its identity + timestamp key.
    ///
    /// A duplicate timestamp under the same identity overwrites in place.
    pub fn write(&self, record: &BatteryRecord) -> Result<()> {
        if record.timestamp.is_empty() {
            return Err(Error::Store("record has no timestamp".into()));
        }

        let dir = self.root.join(record.identity());
        fs::create_dir_all(&dir)
            .map_err(|e| Error::Store(format!("cannot create {}: {}", dir.display(), e)))?;

        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| Error::Store(format!("cannot serialize record: {e}")))?;

        // Write whole-file then rename so a crashed write never leaves a
        // half-record where read_all will find it.
        let path = dir.join(format!("{}.json", record.timestamp));
        let tmp = dir.join(format!("{}.json.tmp", record.timestamp));
        fs::write(&tmp, json)
            .map_err(|e| Error::Store(format!("cannot write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path)
            .map_err(|e| Error::Store(format!("cannot finalize {}: {}", path.display(), e)))?;

        tracing::debug!(
            identity = %record.identity(),
            timestamp = %record.timestamp,
            "record written"
        );
        Ok(())
    }

    /// Read every record ever written for an identity.
    ///
    /// Order is directory order and therefore unspecified -- callers that
    /// need chronology must sort by timestamp. An identity with no records
    /// yields an empty vector, not an error.
    pub fn read_all(&self, identity: &str) -> Result<Vec<BatteryRecord>> {
        let dir = self.root.join(identity);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir)
            .map_err(|e| Error::Store(format!("cannot read {}: {}", dir.display(), e)))?;

        let mut records = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| Error::Store(format!("cannot read {}: {}", dir.display(), e)))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let text = fs::read_to_string(&path)
                .map_err(|e| Error::Store(format!("cannot read {}: {}", path.display(), e)))?;
            let record: BatteryRecord = serde_json::from_str(&text)
                .map_err(|e| Error::Store(format!("cannot parse {}: {}", path.display(), e)))?;
            records.push(record);
        }
        Ok(records)
    }

    /// List every identity that has at least one record.
    pub fn identities(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| Error::Store(format!("cannot read {}: {}", self.root.display(), e)))?;

        let mut identities = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| Error::Store(format!("cannot read {}: {}", self.root.display(), e)))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    identities.push(name.to_string());
                }
            }
        }
        identities.sort();
        Ok(identities)
    }

    /// Resolve which host device a battery was last attached to.
    ///
    /// Scans the identity's history for the chronologically newest record
    /// carrying a usable device serial (non-empty and not the unset
    /// sentinel). `Ok(None)` is a normal outcome -- the battery has never
    /// been seen attached -- and the caller is expected to ask for a fresh
    /// attachment. Batteries persist across device swaps, so remembering
    /// the last known attachment beats demanding it every session.
    pub fn resolve_device(&self, identity: &str) -> Result<Option<String>> {
        let mut records = self.read_all(identity)?;
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        let device = records
            .iter()
            .rev()
            .find(|r| r.has_device())
            .map(|r| r.dev_serial_number.clone());

        tracing::debug!(identity, device = ?device, "device association resolved");
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batlog_core::record::DEV_SN_UNSET;
    use tempfile::TempDir;

    fn record(name: &str, serial: &str, ts: &str, dev: &str) -> BatteryRecord {
        BatteryRecord {
            name: name.into(),
            serial_number: serial.into(),
            timestamp: ts.into(),
            dev_serial_number: dev.into(),
            ..Default::default()
        }
    }

    fn open_store(dir: &TempDir) -> RecordStore {
        RecordStore::open(dir.path().join("db")).unwrap()
    }

    #[test]
    fn write_then_read_all_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let mut written = record("RRC2020", "#0042", "20260801090000", "1234.77");
        written.voltage = 11155;
        written.temperature_k = 305.3;
        written.temperature_c = 32.0;
        written.full_capacity = 6990;
        store.write(&written).unwrap();

        let records = store.read_all("RRC2020#0042").unwrap();
        assert_eq!(records, vec![written]);
    }

    #[test]
    fn unknown_identity_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert_eq!(store.read_all("NEVERSEEN#0").unwrap(), Vec::new());
    }

    #[test]
    fn record_without_timestamp_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let bare = record("RRC2020", "#1", "", "");
        assert!(matches!(store.write(&bare).unwrap_err(), Error::Store(_)));
    }

    #[test]
    fn duplicate_timestamp_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let mut first = record("RRC2020", "#1", "20260801090000", "");
        first.voltage = 11000;
        store.write(&first).unwrap();

        let mut second = first.clone();
        second.voltage = 11155;
        store.write(&second).unwrap();

        let records = store.read_all("RRC2020#1").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].voltage, 11155);
    }

    #[test]
    fn identities_are_isolated() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store
            .write(&record("RRC2020", "#1", "20260801090000", ""))
            .unwrap();
        store
            .write(&record("RRC2040", "#9", "20260801090001", ""))
            .unwrap();

        assert_eq!(store.read_all("RRC2020#1").unwrap().len(), 1);
        assert_eq!(store.read_all("RRC2040#9").unwrap().len(), 1);
        assert_eq!(
            store.identities().unwrap(),
            vec!["RRC2020#1".to_string(), "RRC2040#9".to_string()]
        );
    }

    #[test]
    fn resolve_device_picks_newest_usable_association() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        // Written newest-first to show the result does not depend on
        // insertion or directory order.
        store
            .write(&record("RRC2020", "#1", "20260803090000", DEV_SN_UNSET))
            .unwrap();
        store
            .write(&record("RRC2020", "#1", "20260802090000", "DEV-7"))
            .unwrap();
        store
            .write(&record("RRC2020", "#1", "20260801090000", "DEV-3"))
            .unwrap();

        assert_eq!(
            store.resolve_device("RRC2020#1").unwrap(),
            Some("DEV-7".to_string())
        );
    }

    #[test]
    fn resolve_device_skips_sentinel_and_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store
            .write(&record("RRC2020", "#1", "20260801090000", ""))
            .unwrap();
        store
            .write(&record("RRC2020", "#1", "20260802090000", DEV_SN_UNSET))
            .unwrap();

        assert_eq!(store.resolve_device("RRC2020#1").unwrap(), None);
    }

    #[test]
    fn resolve_device_on_unknown_identity_is_none() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert_eq!(store.resolve_device("NEVERSEEN#0").unwrap(), None);
    }

    #[test]
    fn corrupt_record_surfaces_a_store_error() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store
            .write(&record("RRC2020", "#1", "20260801090000", ""))
            .unwrap();

        let bad = store.root().join("RRC2020#1").join("20260802090000.json");
        fs::write(&bad, b"{ not json").unwrap();

        assert!(matches!(
            store.read_all("RRC2020#1").unwrap_err(),
            Error::Store(_)
        ));
    }
}
