//! Flat key-value settings store.
//!
//! The lifecycle manager reads its decision inputs (`auto_update_db`,
//! `db_installed_by_user`, ...) at the start of each decision and writes
//! install metadata after successful installs. The store is a flat map of
//! primitive values; absence of a key means "use the default".
//!
//! `JsonSettings` persists the map as pretty-printed JSON in the data
//! directory. Values are kept in memory behind an `RwLock` and flushed on
//! every write, so a crash between writes loses at most the last mutation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use log::warn;
use serde_json::Value;

use crate::error_handling::SettingsError;

/// Well-known settings keys.
pub mod keys {
    /// Whether the database auto-updates when stale (bool, default true).
    pub const AUTO_UPDATE_DB: &str = "auto_update_db";
    /// Timestamp of the last successful install (RFC 3339 string).
    pub const DB_LAST_UPDATED: &str = "db_last_updated";
    /// Month token of the installed database (`YYYY-MM` string).
    pub const DB_MONTH: &str = "db_month";
    /// Whether a database was ever installed by explicit user action (bool).
    pub const DB_INSTALLED_BY_USER: &str = "db_installed_by_user";
    /// Preferred external IP provider (`"ipify"` or `"amazon"`).
    pub const IP_PROVIDER: &str = "ip_provider";
    /// External IP request timeout override in seconds (number).
    pub const REQUEST_TIMEOUT_SECS: &str = "request_timeout_secs";
    /// Last successful lookup result, serialized as JSON (string).
    pub const LAST_KNOWN_RECORD: &str = "last_known_record";
}

/// A flat key-value store of primitive values.
///
/// Getters return `None` for absent keys; callers supply defaults. Setters
/// persist durably before returning.
pub trait SettingsStore: Send + Sync {
    /// Returns the string value for `key`, if present.
    fn get_string(&self, key: &str) -> Option<String>;
    /// Stores a string value under `key`.
    fn set_string(&self, key: &str, value: &str) -> Result<(), SettingsError>;
    /// Returns the boolean value for `key`, if present.
    fn get_bool(&self, key: &str) -> Option<bool>;
    /// Stores a boolean value under `key`.
    fn set_bool(&self, key: &str, value: bool) -> Result<(), SettingsError>;
    /// Returns the numeric value for `key`, if present.
    fn get_f64(&self, key: &str) -> Option<f64>;
    /// Stores a numeric value under `key`.
    fn set_f64(&self, key: &str, value: f64) -> Result<(), SettingsError>;
    /// Removes `key` from the store.
    fn remove(&self, key: &str) -> Result<(), SettingsError>;

    /// Returns the timestamp stored under `key`, if present and well-formed.
    ///
    /// Timestamps are persisted as RFC 3339 strings; a corrupt value reads as
    /// absent.
    fn get_datetime(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.get_string(key)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring malformed timestamp under {}: {}", key, e);
                None
            }
        }
    }

    /// Stores a timestamp under `key` as an RFC 3339 string.
    fn set_datetime(&self, key: &str, value: DateTime<Utc>) -> Result<(), SettingsError> {
        self.set_string(key, &value.to_rfc3339())
    }
}

/// JSON-file-backed settings store.
pub struct JsonSettings {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Value>>,
}

impl JsonSettings {
    /// Opens (or initializes) the settings file at `path`.
    ///
    /// A missing file starts an empty store; it is created on first write.
    /// A malformed file is an error rather than silent data loss.
    pub fn open(path: &Path) -> Result<Self, SettingsError> {
        let values = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(SettingsError::Io(e)),
        };
        Ok(Self {
            path: path.to_path_buf(),
            values: RwLock::new(values),
        })
    }

    fn read_value(&self, key: &str) -> Option<Value> {
        let values = self.values.read().ok()?;
        values.get(key).cloned()
    }

    fn write_value(&self, key: &str, value: Option<Value>) -> Result<(), SettingsError> {
        let snapshot = {
            let mut values = self
                .values
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match value {
                Some(v) => values.insert(key.to_string(), v),
                None => values.remove(key),
            };
            values.clone()
        };
        self.persist(&snapshot)
    }

    fn persist(&self, values: &BTreeMap<String, Value>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettings {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.read_value(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.write_value(key, Some(Value::String(value.to_string())))
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.read_value(key)?.as_bool()
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        self.write_value(key, Some(Value::Bool(value)))
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        self.read_value(key)?.as_f64()
    }

    fn set_f64(&self, key: &str, value: f64) -> Result<(), SettingsError> {
        let number = serde_json::Number::from_f64(value).ok_or_else(|| {
            SettingsError::Malformed(serde_json::Error::io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "non-finite number",
            )))
        })?;
        self.write_value(key, Some(Value::Number(number)))
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.write_value(key, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn open_in(dir: &TempDir) -> JsonSettings {
        JsonSettings::open(&dir.path().join("settings.json")).expect("open settings")
    }

    #[test]
    fn test_absent_keys_read_as_none() {
        let dir = TempDir::new().expect("temp dir");
        let settings = open_in(&dir);
        assert_eq!(settings.get_string(keys::DB_MONTH), None);
        assert_eq!(settings.get_bool(keys::AUTO_UPDATE_DB), None);
        assert_eq!(settings.get_f64(keys::REQUEST_TIMEOUT_SECS), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.json");
        {
            let settings = JsonSettings::open(&path).expect("open");
            settings.set_string(keys::DB_MONTH, "2026-02").expect("set");
            settings.set_bool(keys::DB_INSTALLED_BY_USER, true).expect("set");
            settings.set_f64(keys::REQUEST_TIMEOUT_SECS, 7.5).expect("set");
        }
        let reopened = JsonSettings::open(&path).expect("reopen");
        assert_eq!(reopened.get_string(keys::DB_MONTH).as_deref(), Some("2026-02"));
        assert_eq!(reopened.get_bool(keys::DB_INSTALLED_BY_USER), Some(true));
        assert_eq!(reopened.get_f64(keys::REQUEST_TIMEOUT_SECS), Some(7.5));
    }

    #[test]
    fn test_datetime_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let settings = open_in(&dir);
        let instant = Utc.with_ymd_and_hms(2026, 2, 15, 12, 0, 0).unwrap();
        settings
            .set_datetime(keys::DB_LAST_UPDATED, instant)
            .expect("set");
        assert_eq!(settings.get_datetime(keys::DB_LAST_UPDATED), Some(instant));
    }

    #[test]
    fn test_malformed_timestamp_reads_as_absent() {
        let dir = TempDir::new().expect("temp dir");
        let settings = open_in(&dir);
        settings
            .set_string(keys::DB_LAST_UPDATED, "not-a-timestamp")
            .expect("set");
        assert_eq!(settings.get_datetime(keys::DB_LAST_UPDATED), None);
    }

    #[test]
    fn test_wrong_type_reads_as_none() {
        let dir = TempDir::new().expect("temp dir");
        let settings = open_in(&dir);
        settings.set_bool(keys::DB_MONTH, true).expect("set");
        // A bool under a key read as string is absent, not a panic
        assert_eq!(settings.get_string(keys::DB_MONTH), None);
    }

    #[test]
    fn test_remove_deletes_key() {
        let dir = TempDir::new().expect("temp dir");
        let settings = open_in(&dir);
        settings.set_bool(keys::AUTO_UPDATE_DB, false).expect("set");
        settings.remove(keys::AUTO_UPDATE_DB).expect("remove");
        assert_eq!(settings.get_bool(keys::AUTO_UPDATE_DB), None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(JsonSettings::open(&path).is_err());
    }

    #[test]
    fn test_missing_parent_directory_created_on_write() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("settings.json");
        let settings = JsonSettings::open(&path).expect("open");
        settings.set_string(keys::DB_MONTH, "2026-01").expect("set");
        assert!(path.exists());
    }
}
