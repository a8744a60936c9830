//! Error type definitions.
//!
//! This module defines all error types used throughout the application, one
//! enum per component boundary.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Error types for archive downloads.
///
/// `Transfer` carries the HTTP status so the lifecycle manager can recognize
/// a 404 and fall back to the previous month's artifact name.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure: unreachable host, connection reset, timeout.
    #[error("Network error downloading archive: {0}")]
    Network(#[source] reqwest::Error),

    /// The remote responded with a non-2xx status.
    #[error("Archive download failed with HTTP {status}")]
    Transfer {
        /// HTTP status code returned by the remote.
        status: u16,
    },

    /// The local temporary file could not be created or written.
    #[error("Failed to write archive to temporary file: {0}")]
    Write(#[source] std::io::Error),
}

/// Error types for archive extraction, validation, and installation.
#[derive(Error, Debug)]
pub enum InstallError {
    /// Decompression or tar parsing failed; carries the decoder's diagnostic.
    #[error("Archive extraction failed: {0}")]
    Extraction(String),

    /// The archive decompressed cleanly but no member matched the expected
    /// database filename.
    #[error("{0} not found in archive")]
    FileNotFoundInArchive(String),

    /// The extracted file was rejected by the geo-database codec.
    #[error("Extracted file is not a usable geolocation database")]
    Validation,

    /// Filesystem failure while moving the database into place.
    #[error("Failed to install database file: {0}")]
    Install(#[from] std::io::Error),
}

/// Internal error type for the database lifecycle manager.
///
/// These never escape `DatabaseLifecycle`: every failure is converted into
/// status state (`DatabaseStatus::InstallFailed`) because the lifecycle
/// manager is polled, not awaited-with-error-handling.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Archive download failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Extraction, validation, or installation failed.
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Every candidate month's artifact returned 404.
    #[error("Database not published for any candidate month")]
    NotFoundForCandidates,
}

/// Error types for point lookups against the active database.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// No database handle is open (nothing installed, or `load()` not called).
    #[error("Geolocation database is not loaded")]
    DatabaseNotLoaded,

    /// The codec returned no entry for the address.
    #[error("No geolocation record found for IP")]
    RecordNotFound,
}

/// Error types for external IP resolution.
#[derive(Error, Debug)]
pub enum IpResolveError {
    /// Transport-level failure: unreachable host, connection reset, timeout.
    #[error("Network error resolving external IP: {0}")]
    Network(#[source] reqwest::Error),

    /// The provider responded with a non-2xx status.
    #[error("IP provider returned HTTP {status}")]
    Transfer {
        /// HTTP status code returned by the provider.
        status: u16,
    },

    /// The provider's body did not contain a syntactically valid IP address.
    #[error("Unable to parse IP provider response")]
    Parse,
}

/// Error types for the settings store.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The backing file could not be read or written.
    #[error("Settings file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file held malformed JSON.
    #[error("Settings file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}
