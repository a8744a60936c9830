//! Database lifecycle: fetch, install, status, update policy.
//!
//! This module provides:
//! - Archive fetcher (streaming download with progress)
//! - Archive installer (extract, validate, atomic rename-based install)
//! - Lifecycle manager (status view, update gating, candidate-month fallback)

mod fetcher;
mod installer;
mod lifecycle;
mod status;

// Re-export public API
pub use fetcher::{fetch_archive, ProgressFn};
pub use installer::ArchiveInstaller;
pub use lifecycle::DatabaseLifecycle;
pub use status::DatabaseStatus;
