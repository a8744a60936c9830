//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application, including timeouts, endpoint defaults, and the update policy.

// constants (used as defaults)
/// Filename of the active database inside the data directory.
pub const DB_FILENAME: &str = "dbip-city-lite.mmdb";

/// Base URL for monthly database snapshots. The artifact name is
/// `dbip-city-lite-<YYYY-MM>.mmdb.gz` appended to this base.
pub const DOWNLOAD_BASE: &str = "https://download.db-ip.com/free";

/// How old an installed database may get before an update is due, in days.
/// Elapsed time is compared strictly greater-than: exactly 30 days does not
/// trigger an update.
pub const UPDATE_INTERVAL_DAYS: i64 = 30;

// Network operation timeouts
/// Archive download timeout in seconds. Downloads are tens of megabytes, so
/// this is much longer than the IP-echo timeout.
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;
/// External IP lookup timeout in seconds.
pub const IP_TIMEOUT_SECS: u64 = 5;

// External IP providers
/// JSON provider: responds with `{"ip": "<addr>"}`.
pub const IPIFY_URL: &str = "https://api64.ipify.org?format=json";
/// Plaintext provider: responds with a bare address and trailing newline.
pub const AMAZON_URL: &str = "https://checkip.amazonaws.com";

/// Default data directory holding the active database and settings file.
pub const DATA_DIR: &str = "./ip_region_data";

/// Default interval between refresh cycles in watch mode, in seconds.
pub const WATCH_INTERVAL_SECS: u64 = 300;
