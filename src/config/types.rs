//! Configuration types.
//!
//! This module defines enums and structs used for configuration. `Config` is
//! the library-facing struct; the CLI binary maps its arguments onto it.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{
    AMAZON_URL, DATA_DIR, DOWNLOAD_BASE, DOWNLOAD_TIMEOUT_SECS, IPIFY_URL, IP_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// External IP provider selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum IpProvider {
    /// api64.ipify.org, JSON body `{"ip": "<addr>"}`
    Ipify,
    /// checkip.amazonaws.com, bare plaintext address
    Amazon,
}

impl IpProvider {
    /// Parses the settings-store representation, defaulting to Ipify.
    pub fn from_settings(value: Option<&str>) -> Self {
        match value {
            Some("amazon") => IpProvider::Amazon,
            _ => IpProvider::Ipify,
        }
    }

    /// The settings-store representation of this provider.
    pub fn as_settings_str(&self) -> &'static str {
        match self {
            IpProvider::Ipify => "ipify",
            IpProvider::Amazon => "amazon",
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use ip_region::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/var/lib/ip_region"),
///     download_timeout_secs: 60,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the active database file and the settings file
    pub data_dir: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Base URL for monthly database snapshots
    pub download_base: String,

    /// Archive download timeout in seconds
    pub download_timeout_secs: u64,

    /// External IP lookup timeout in seconds (a persisted
    /// `request_timeout_secs` setting overrides this default)
    pub ip_timeout_secs: u64,

    /// Preferred external IP provider (a persisted `ip_provider` setting
    /// overrides this default)
    pub ip_provider: IpProvider,

    /// URL of the JSON IP-echo provider
    pub ipify_url: String,

    /// URL of the plaintext IP-echo provider
    pub amazon_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DATA_DIR),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            download_base: DOWNLOAD_BASE.to_string(),
            download_timeout_secs: DOWNLOAD_TIMEOUT_SECS,
            ip_timeout_secs: IP_TIMEOUT_SECS,
            ip_provider: IpProvider::Ipify,
            ipify_url: IPIFY_URL.to_string(),
            amazon_url: AMAZON_URL.to_string(),
        }
    }
}

impl Config {
    /// Path of the active database file inside the data directory.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(crate::config::constants::DB_FILENAME)
    }

    /// Path of the JSON settings file inside the data directory.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }
}
