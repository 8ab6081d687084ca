//! CLI configuration and data-directory layout.
//!
//! Everything the tool persists lives under one data directory:
//!
//! ```text
//! <data>/db/                        the record store
//! <data>/misc/                      scratch space (adapter dumps etc.)
//! <data>/GeneralConfiguration.json  serial port and remote-sync settings
//! <data>/BatteryProfiles.json       battery wear profiles
//! ```
//!
//! The configuration file keeps its historical field names so existing
//! installations read back unchanged. The remote-sync fields are carried
//! as data only; no sync operation consumes them yet.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use batlog::{save_profiles, BatteryProfile};

/// Resolved locations under the data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataPaths { root: root.into() }
    }

    /// The data directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The record store root.
    pub fn db_dir(&self) -> PathBuf {
        self.root.join("db")
    }

    /// Scratch directory for adapter dumps and exports.
    pub fn misc_dir(&self) -> PathBuf {
        self.root.join("misc")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("GeneralConfiguration.json")
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.root.join("BatteryProfiles.json")
    }
}

/// Persisted tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfiguration {
    /// Serial port of the readout adapter.
    #[serde(rename = "serialport")]
    pub serial_port: String,
    /// Remote host for syncing the database.
    #[serde(rename = "remotehost")]
    pub remote_host: String,
    /// Port for syncing the database.
    #[serde(rename = "remoteport")]
    pub remote_port: String,
    /// Username for remote access.
    #[serde(rename = "remoteuser")]
    pub remote_user: String,
    /// Password for remote access.
    #[serde(rename = "remotepassword")]
    pub remote_password: String,
}

impl Default for GeneralConfiguration {
    fn default() -> Self {
        let serial_port = if cfg!(windows) {
            "COM4".to_string()
        } else {
            "/dev/ttyUSB0".to_string()
        };
        GeneralConfiguration {
            serial_port,
            remote_host: "no-such.server.info".into(),
            remote_port: "8080".into(),
            remote_user: "defUser".into(),
            remote_password: "defPassword".into(),
        }
    }
}

impl GeneralConfiguration {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("cannot parse configuration {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).context("cannot serialize configuration")?;
        fs::write(path, json)
            .with_context(|| format!("cannot write configuration {}", path.display()))
    }

    /// Load the configuration, running first-time initialization if the
    /// data directory has never been set up.
    pub fn load_or_init(paths: &DataPaths) -> Result<Self> {
        if !paths.config_path().exists() {
            println!("Configuration not found. Running first time initialization ...");
            let config = bootstrap(paths)?;
            println!("First time initialization completed!");
            return Ok(config);
        }
        Self::load(&paths.config_path())
    }
}

/// Create the data directory layout, a default configuration, and a demo
/// battery profile. Existing files are left untouched.
pub fn bootstrap(paths: &DataPaths) -> Result<GeneralConfiguration> {
    for dir in [paths.db_dir(), paths.misc_dir()] {
        fs::create_dir_all(&dir)
            .with_context(|| format!("cannot create directory {}", dir.display()))?;
    }

    let config = if paths.config_path().exists() {
        GeneralConfiguration::load(&paths.config_path())?
    } else {
        let config = GeneralConfiguration::default();
        config.save(&paths.config_path())?;
        config
    };

    if !paths.profiles_path().exists() {
        save_profiles(&paths.profiles_path(), &[BatteryProfile::demo()])
            .context("cannot write demo battery profile")?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_port_is_platform_specific() {
        let config = GeneralConfiguration::default();
        if cfg!(windows) {
            assert_eq!(config.serial_port, "COM4");
        } else {
            assert_eq!(config.serial_port, "/dev/ttyUSB0");
        }
    }

    #[test]
    fn config_round_trips_with_persisted_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("GeneralConfiguration.json");

        let mut config = GeneralConfiguration::default();
        config.serial_port = "/dev/ttyACM3".into();
        config.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("serialport"));
        assert!(text.contains("remotehost"));

        assert_eq!(GeneralConfiguration::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_fields_default_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("GeneralConfiguration.json");
        fs::write(&path, r#"{"serialport": "/dev/ttyS0"}"#).unwrap();

        let config = GeneralConfiguration::load(&path).unwrap();
        assert_eq!(config.serial_port, "/dev/ttyS0");
        assert_eq!(config.remote_port, "8080");
    }

    #[test]
    fn bootstrap_creates_layout_once() {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::new(dir.path().join("data"));

        let config = bootstrap(&paths).unwrap();
        assert!(paths.db_dir().is_dir());
        assert!(paths.misc_dir().is_dir());
        assert!(paths.config_path().is_file());
        assert!(paths.profiles_path().is_file());

        // A second bootstrap must not clobber an edited configuration.
        let mut edited = config;
        edited.serial_port = "/dev/ttyACM0".into();
        edited.save(&paths.config_path()).unwrap();

        let reloaded = bootstrap(&paths).unwrap();
        assert_eq!(reloaded.serial_port, "/dev/ttyACM0");
    }

    #[test]
    fn load_or_init_bootstraps_fresh_directory() {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths::new(dir.path().join("data"));
        let config = GeneralConfiguration::load_or_init(&paths).unwrap();
        assert_eq!(config, GeneralConfiguration::default());
        assert!(paths.config_path().is_file());
    }
}
