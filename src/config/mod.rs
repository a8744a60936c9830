//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, endpoint defaults, update policy)
//! - Library configuration types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, IpProvider, LogFormat, LogLevel};
