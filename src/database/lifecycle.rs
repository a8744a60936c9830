//! Database lifecycle manager.
//!
//! Orchestrates fetch + extract + validate + install, tracks install metadata
//! in the settings store, decides whether an update is due, and exposes a
//! consistent status view to concurrent readers.
//!
//! Concurrency discipline: installs are serialized by an async mutex held
//! across the whole operation. The transient status overlay lives in a
//! `RwLock` and is set before any I/O begins and cleared only after the
//! install metadata is persisted, so a `status()` poll is never inconsistent
//! with the file on disk. All failures are converted into status state; none
//! of the public operations return errors.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};
use log::{info, warn};

use crate::clock::Clock;
use crate::codec::GeoCodec;
use crate::config::{Config, DB_FILENAME, UPDATE_INTERVAL_DAYS};
use crate::database::fetcher::fetch_archive;
use crate::database::installer::ArchiveInstaller;
use crate::database::status::DatabaseStatus;
use crate::error_handling::{FetchError, LifecycleError};
use crate::settings::{keys, SettingsStore};

/// In-flight operation state, overlaid on persisted status.
#[derive(Debug, Clone, Copy)]
enum Transient {
    Installing(f64),
    Failed,
}

/// Manages the active database file: status, installs, and update policy.
pub struct DatabaseLifecycle {
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    client: Arc<reqwest::Client>,
    installer: ArchiveInstaller,
    data_dir: PathBuf,
    download_base: String,
    download_timeout: Duration,
    transient: RwLock<Option<Transient>>,
    install_gate: tokio::sync::Mutex<()>,
}

impl DatabaseLifecycle {
    /// Creates a lifecycle manager with injected collaborators.
    pub fn new(
        config: &Config,
        settings: Arc<dyn SettingsStore>,
        codec: Arc<dyn GeoCodec>,
        clock: Arc<dyn Clock>,
        client: Arc<reqwest::Client>,
    ) -> Self {
        Self {
            settings,
            clock,
            client,
            installer: ArchiveInstaller::new(codec, DB_FILENAME),
            data_dir: config.data_dir.clone(),
            download_base: config.download_base.trim_end_matches('/').to_string(),
            download_timeout: Duration::from_secs(config.download_timeout_secs),
            transient: RwLock::new(None),
            install_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Path of the active database file, whether or not it exists yet.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILENAME)
    }

    /// Path of the active database file, or `None` when nothing is installed.
    pub fn active_database_path(&self) -> Option<PathBuf> {
        let path = self.database_path();
        path.exists().then_some(path)
    }

    /// Whether an active database file exists on disk.
    pub fn is_installed(&self) -> bool {
        self.database_path().exists()
    }

    /// Current status: the transient overlay if an operation is in flight,
    /// else derived from on-disk existence and stored metadata.
    pub fn status(&self) -> DatabaseStatus {
        if let Ok(transient) = self.transient.read() {
            match *transient {
                Some(Transient::Installing(progress)) => {
                    return DatabaseStatus::Installing { progress };
                }
                Some(Transient::Failed) => return DatabaseStatus::InstallFailed,
                None => {}
            }
        }

        if !self.is_installed() {
            return DatabaseStatus::NotInstalled;
        }

        DatabaseStatus::Installed {
            month: self.resolve_installed_month(),
        }
    }

    /// Month token of the active database, or `"unknown"` when nothing is
    /// installed or the metadata is missing.
    pub fn resolve_active_month(&self) -> String {
        if !self.is_installed() {
            return "unknown".to_string();
        }
        self.resolve_installed_month()
    }

    /// Runs a full fetch + extract + validate + install cycle.
    ///
    /// Returns whether installation succeeded. Never returns an error: all
    /// failures are swallowed into `DatabaseStatus::InstallFailed`, since
    /// this is a background-friendly operation callers poll.
    pub async fn install_or_update_now(&self) -> bool {
        let _gate = self.install_gate.lock().await;
        self.set_transient(Some(Transient::Installing(0.0)));

        match self.download_and_install().await {
            Ok(month) => {
                self.persist_install_metadata(&month);
                // Metadata is durably written; only now may status read
                // Installed again.
                self.set_transient(None);
                info!("Database installed: {} snapshot", month);
                true
            }
            Err(e) => {
                warn!("Database update failed: {}", e);
                self.set_transient(Some(Transient::Failed));
                false
            }
        }
    }

    /// Installs an update when one is due, returning whether an install ran
    /// and succeeded.
    ///
    /// No-op unless ALL of: auto-update is enabled, a database was previously
    /// installed by explicit user action (a pre-bundled file does not count),
    /// an active file exists, and the elapsed time since the last recorded
    /// update exceeds the update interval. A missing last-update record
    /// counts as due.
    pub async fn update_if_due(&self) -> bool {
        if !self.is_auto_update_enabled() {
            return false;
        }
        if !self.is_user_installed() {
            return false;
        }
        if !self.is_installed() {
            return false;
        }
        if !self.is_update_overdue() {
            return false;
        }

        self.install_or_update_now().await
    }

    /// Whether the user should be nudged to update manually.
    ///
    /// Disabling auto-update silences the normal refresh path, so this is
    /// true only when auto-update is off, a database is installed, and the
    /// reference date (last recorded update, else the first day of the
    /// installed month) is older than the update interval.
    pub fn needs_manual_reminder(&self) -> bool {
        if self.is_auto_update_enabled() {
            return false;
        }
        if !self.is_installed() {
            return false;
        }
        let Some(reference) = self.reminder_reference_date() else {
            return false;
        };
        self.clock.now() - reference > ChronoDuration::days(UPDATE_INTERVAL_DAYS)
    }

    async fn download_and_install(&self) -> Result<String, LifecycleError> {
        for month in self.candidate_months() {
            match self.attempt_install(&month).await {
                Ok(()) => return Ok(month),
                Err(LifecycleError::Fetch(FetchError::Transfer { status: 404 })) => {
                    // Publish lag: the new month's file may not exist yet on
                    // the 1st. Fall through to the previous month's name.
                    warn!("Snapshot {} not published yet (404)", month);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Err(LifecycleError::NotFoundForCandidates)
    }

    async fn attempt_install(&self, month: &str) -> Result<(), LifecycleError> {
        let url = format!("{}/dbip-city-lite-{}.mmdb.gz", self.download_base, month);
        info!("Fetching database snapshot {}", url);

        let archive = fetch_archive(&self.client, &url, self.download_timeout, &|progress| {
            self.set_transient(Some(Transient::Installing(progress)));
        })
        .await?;

        let result = self.extract_validate_install(&archive);
        // The fetch temp file is ours to clean up on success and failure
        let _ = std::fs::remove_file(&archive);
        result
    }

    fn extract_validate_install(&self, archive: &std::path::Path) -> Result<(), LifecycleError> {
        let extracted = self.installer.extract(archive)?;
        let result = self
            .installer
            .validate(&extracted)
            .and_then(|()| self.installer.install(&extracted, &self.database_path()));
        let _ = std::fs::remove_file(&extracted);
        result.map_err(LifecycleError::from)
    }

    fn persist_install_metadata(&self, month: &str) {
        let now = self.clock.now();
        let results = [
            self.settings.set_datetime(keys::DB_LAST_UPDATED, now),
            self.settings.set_string(keys::DB_MONTH, month),
            self.settings.set_bool(keys::DB_INSTALLED_BY_USER, true),
        ];
        for result in results {
            if let Err(e) = result {
                warn!("Failed to persist install metadata: {}", e);
            }
        }
    }

    fn set_transient(&self, value: Option<Transient>) {
        if let Ok(mut transient) = self.transient.write() {
            *transient = value;
        }
    }

    fn resolve_installed_month(&self) -> String {
        self.settings
            .get_string(keys::DB_MONTH)
            .filter(|month| !month.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn is_auto_update_enabled(&self) -> bool {
        self.settings.get_bool(keys::AUTO_UPDATE_DB).unwrap_or(true)
    }

    fn is_user_installed(&self) -> bool {
        self.settings
            .get_bool(keys::DB_INSTALLED_BY_USER)
            .unwrap_or(false)
    }

    fn is_update_overdue(&self) -> bool {
        match self.settings.get_datetime(keys::DB_LAST_UPDATED) {
            Some(last_update) => {
                self.clock.now() - last_update > ChronoDuration::days(UPDATE_INTERVAL_DAYS)
            }
            // Installed but never recorded: treat as due
            None => true,
        }
    }

    fn reminder_reference_date(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        if let Some(last_update) = self.settings.get_datetime(keys::DB_LAST_UPDATED) {
            return Some(last_update);
        }
        // Fall back to the installed month's implied date
        let month = self.resolve_installed_month();
        if month == "unknown" {
            return None;
        }
        let date = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").ok()?;
        Some(
            date.and_hms_opt(0, 0, 0)?
                .and_local_timezone(chrono::Utc)
                .single()?,
        )
    }

    fn candidate_months(&self) -> Vec<String> {
        let now = self.clock.now();
        let current = format!("{:04}-{:02}", now.year(), now.month());
        let (prev_year, prev_month) = if now.month() == 1 {
            (now.year() - 1, 12)
        } else {
            (now.year(), now.month() - 1)
        };
        let previous = format!("{:04}-{:02}", prev_year, prev_month);

        if previous == current {
            vec![current]
        } else {
            vec![current, previous]
        }
    }
}
