//! batlog-store: persistence for battery readings.
//!
//! Provides [`RecordStore`], the per-identity JSON append log (one file per
//! reading, one directory per battery), and [`BatteryProfile`], the wear
//! thresholds used to judge a battery's health from its history.
//!
//! The store favors availability over strict consistency: writes are
//! last-write-wins per identity + timestamp, and a disagreement between a
//! fresh reading's device association and the stored history is something
//! callers warn about, never a write-blocking error.

mod profile;
mod store;

pub use profile::{
    load_profiles, match_profile, save_profiles, BatteryProfile, HealthStatus,
};
pub use store::RecordStore;
