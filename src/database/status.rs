//! Database status view.

use std::fmt;

/// A derived, point-in-time view of the database lifecycle.
///
/// `Installing` and `InstallFailed` come from the in-memory transient overlay
/// and take precedence over persisted state, so concurrent status reads
/// during an install see `Installing`, not a stale `Installed`.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseStatus {
    /// No active database file exists.
    NotInstalled,
    /// An install is in flight.
    Installing {
        /// Download progress in `[0, 1]`; 0 when the total size is unknown.
        progress: f64,
    },
    /// An active database file exists.
    Installed {
        /// Month token of the installed snapshot, or `"unknown"` when the
        /// persisted metadata is missing or corrupt.
        month: String,
    },
    /// The most recent install attempt failed; the previously installed
    /// database (if any) is still intact and usable.
    InstallFailed,
}

impl fmt::Display for DatabaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseStatus::NotInstalled => write!(f, "not installed"),
            DatabaseStatus::Installing { progress } => {
                write!(f, "installing ({:.0}%)", progress * 100.0)
            }
            DatabaseStatus::Installed { month } => write!(f, "installed ({})", month),
            DatabaseStatus::InstallFailed => write!(f, "update failed"),
        }
    }
}
