//! Wappalyzergo format loader.
//!
//! This module handles loading fingerprints in wappalyzergo's format:
//! - Wrapper structure: `{"apps": {"Technology": {...}}}`
//! - Uses `scriptSrc` instead of `script`
//! - Patterns are already normalized to lowercase

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

use crate::fingerprint::models::Technology;

/// Wappalyzergo's fingerprint file structure
#[derive(serde::Deserialize)]
struct WappalyzergoFingerprints {
    apps: HashMap<String, Technology>,
}

/// Loads technologies from wappalyzergo's fingerprints_data.json format
pub(crate) async fn load_wappalyzergo_format(path: &Path) -> Result<HashMap<String, Technology>> {
    let content = fs::read_to_string(path).await.with_context(|| {
        format!(
            "Failed to read wappalyzergo fingerprints from: {}",
            path.display()
        )
    })?;

    let wapp_data: WappalyzergoFingerprints =
        serde_json::from_str(&content).with_context(|| {
            format!(
                "Failed to parse wappalyzergo fingerprints JSON from: {}",
                path.display()
            )
        })?;

    log::info!(
        "Loaded {} technologies from wappalyzergo format",
        wapp_data.apps.len()
    );

    Ok(wapp_data.apps)
}
