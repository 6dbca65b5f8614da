use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from TOML.
///
/// The first five keys are the external contract inherited from earlier
/// deployments; renaming them would break existing config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Device identifiers to monitor, e.g. `/dev/sda`.
    #[serde(default = "default_monitored_disks")]
    pub monitored_disks: Vec<String>,
    /// Directory receiving timestamped backup directories.
    #[serde(default = "default_backup_location")]
    pub backup_location: String,
    /// Seconds between monitoring cycles.
    #[serde(default = "default_check_interval")]
    pub smart_check_interval: u64,
    /// Health score below which a protective backup is triggered.
    #[serde(default = "default_backup_threshold")]
    pub backup_threshold: f64,
    /// SQLite database path (tilde-expanded at point of use).
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Temporary mount point used during backup.
    #[serde(default = "default_mount_point")]
    pub backup_mount_point: String,
    /// Optional per-device cool-down between backup attempts, in seconds.
    /// Absent means the reference behaviour: re-trigger every cycle the
    /// score stays low.
    #[serde(default)]
    pub backup_cooldown_secs: Option<u64>,
    /// Upper bound on the backup copy step, in seconds.
    #[serde(default = "default_copy_timeout")]
    pub copy_timeout_secs: u64,
}

// --- Defaults ---

fn default_monitored_disks() -> Vec<String> {
    vec!["/dev/sda".into(), "/dev/sdb".into()]
}

fn default_backup_location() -> String {
    "/mnt/backup".into()
}

const fn default_check_interval() -> u64 {
    3600
}

const fn default_backup_threshold() -> f64 {
    0.7
}

fn default_database_path() -> String {
    "/var/lib/disksentry/disk_health.db".into()
}

fn default_mount_point() -> String {
    "/tmp/disksentry_backup".into()
}

const fn default_copy_timeout() -> u64 {
    3600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            monitored_disks: default_monitored_disks(),
            backup_location: default_backup_location(),
            smart_check_interval: default_check_interval(),
            backup_threshold: default_backup_threshold(),
            database_path: default_database_path(),
            backup_mount_point: default_mount_point(),
            backup_cooldown_secs: None,
            copy_timeout_secs: default_copy_timeout(),
        }
    }
}

impl AppConfig {
    /// Load config from default path or create a default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// invalid, or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config.normalized())
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("disksentry").join("config.toml"))
    }

    // Scores live in [0, 1]; an out-of-range threshold from a hand-edited
    // file is clamped rather than rejected.
    fn normalized(mut self) -> Self {
        self.backup_threshold = self.backup_threshold.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_matches_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.monitored_disks, vec!["/dev/sda", "/dev/sdb"]);
        assert_eq!(config.backup_location, "/mnt/backup");
        assert_eq!(config.smart_check_interval, 3600);
        assert!((config.backup_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.database_path, "/var/lib/disksentry/disk_health.db");
        assert_eq!(config.backup_mount_point, "/tmp/disksentry_backup");
        assert!(config.backup_cooldown_secs.is_none());
        assert_eq!(config.copy_timeout_secs, 3600);
    }

    #[test]
    fn serde_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let deserialized: AppConfig = toml::from_str(&toml_str).expect("deserialize");

        assert_eq!(deserialized.monitored_disks, config.monitored_disks);
        assert_eq!(deserialized.backup_location, config.backup_location);
        assert_eq!(
            deserialized.smart_check_interval,
            config.smart_check_interval
        );
        assert_eq!(deserialized.database_path, config.database_path);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse empty toml");
        assert_eq!(config.smart_check_interval, 3600);
        assert!((config.backup_threshold - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_fills_missing_with_defaults() {
        let toml_str = r#"
monitored_disks = ["/dev/nvme0n1"]
backup_threshold = 0.5
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse partial toml");
        assert_eq!(config.monitored_disks, vec!["/dev/nvme0n1"]);
        assert!((config.backup_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.backup_location, "/mnt/backup");
        assert_eq!(config.smart_check_interval, 3600);
    }

    #[test]
    fn load_from_file() {
        let toml_str = r#"
monitored_disks = ["/dev/sdc"]
smart_check_interval = 60
backup_cooldown_secs = 7200
"#;
        let mut tmpfile = tempfile::NamedTempFile::new().expect("create tempfile");
        tmpfile
            .write_all(toml_str.as_bytes())
            .expect("write tmpfile");

        let config = AppConfig::load_from(tmpfile.path()).expect("load from file");
        assert_eq!(config.monitored_disks, vec!["/dev/sdc"]);
        assert_eq!(config.smart_check_interval, 60);
        assert_eq!(config.backup_cooldown_secs, Some(7200));
    }

    #[test]
    fn load_from_clamps_out_of_range_threshold() {
        let mut tmpfile = tempfile::NamedTempFile::new().expect("create tempfile");
        tmpfile
            .write_all(b"backup_threshold = 1.5")
            .expect("write tmpfile");

        let config = AppConfig::load_from(tmpfile.path()).expect("load");
        assert!((config.backup_threshold - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn save_to_creates_file_and_directories() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join("subdir").join("config.toml");

        let config = AppConfig::default();
        config.save_to(&path).expect("save_to");

        assert!(path.exists());
        let reloaded = AppConfig::load_from(&path).expect("reload");
        assert_eq!(reloaded.monitored_disks, config.monitored_disks);
        assert_eq!(reloaded.database_path, config.database_path);
    }

    #[test]
    fn load_or_create_creates_default_when_missing() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join("disksentry").join("config.toml");

        assert!(!path.exists());
        let config = AppConfig::load_or_create(&path).expect("load_or_create");

        assert!(path.exists());
        assert_eq!(config.smart_check_interval, 3600);

        let reloaded = AppConfig::load_from(&path).expect("reload created file");
        assert_eq!(reloaded.monitored_disks, config.monitored_disks);
    }

    #[test]
    fn load_or_create_loads_existing_file() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "smart_check_interval = 42\n").expect("write");

        let config = AppConfig::load_or_create(&path).expect("load_or_create");
        assert_eq!(config.smart_check_interval, 42);
    }

    #[test]
    fn load_from_nonexistent_file_fails() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let missing = dir.path().join("missing-config.toml");
        assert!(AppConfig::load_from(&missing).is_err());
    }

    #[test]
    fn invalid_toml_fails() {
        let mut tmpfile = tempfile::NamedTempFile::new().expect("create tempfile");
        tmpfile
            .write_all(b"this is not valid toml [[[")
            .expect("write");

        assert!(AppConfig::load_from(tmpfile.path()).is_err());
    }
}
