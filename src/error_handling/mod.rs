//! Error handling.
//!
//! This module provides the error type definitions used across component
//! boundaries. Lifecycle failures are converted into status state by the
//! lifecycle manager; lookup and IP-resolution failures propagate to the
//! immediate caller, which is expected to degrade gracefully.

mod types;

// Re-export public API
pub use types::{
    FetchError, InitializationError, InstallError, IpResolveError, LifecycleError, LookupError,
    SettingsError,
};
