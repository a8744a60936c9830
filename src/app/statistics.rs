//! Statistics printing and database updates.

use anyhow::{Context, Result};
use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::database;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats, WarningType};
use crate::utils::TimingStats;

/// Prints final statistics and updates the database with run statistics.
///
/// This function is used internally by the library and in tests.
#[allow(dead_code)] // Used in tests
pub async fn print_and_save_final_statistics(
    pool: &sqlx::SqlitePool,
    run_id: &str,
    total_urls_attempted: &Arc<AtomicUsize>,
    completed_urls: &Arc<AtomicUsize>,
    failed_urls: &Arc<AtomicUsize>,
    error_stats: &Arc<ProcessingStats>,
    elapsed_seconds: f64,
) -> Result<()> {
    // Calculate run statistics
    // All tasks have completed at this point, so counters should be final
    // Safe casts: URL counts should be reasonable (< i32::MAX ~2B) for SQLite storage
    // Realistic usage scenarios won't exceed this limit
    #[allow(clippy::cast_possible_truncation)]
    let total_urls = total_urls_attempted.load(Ordering::SeqCst) as i32;
    #[allow(clippy::cast_possible_truncation)]
    let successful_urls = completed_urls.load(Ordering::SeqCst) as i32;
    // Use actual failed_urls counter instead of calculating it
    // This ensures accuracy even if there are pending URLs
    #[allow(clippy::cast_possible_truncation)]
    let failed_urls_count = failed_urls.load(Ordering::SeqCst) as i32;

    info!(
        "Run statistics: total={}, successful={}, failed={}",
        total_urls, successful_urls, failed_urls_count
    );

    // Update run statistics in database
    let stats = database::RunStats {
        run_id,
        total_urls,
        successful_urls,
        failed_urls: failed_urls_count,
        elapsed_seconds,
    };
    database::update_run_stats(pool, &stats)
        .await
        .context("Failed to update run statistics")?;

    // Print processing statistics
    print_error_statistics(error_stats);

    // Print simple one-line summary at the end
    print_simple_summary(
        total_urls,
        successful_urls,
        failed_urls_count,
        elapsed_seconds,
    );

    Ok(())
}

/// Prints a simple one-line summary of the run.
///
/// This provides immediate feedback to the user in a concise format.
/// Works with both plain and JSON log formats (log::info! handles formatting).
#[allow(dead_code)] // Used internally by print_and_save_final_statistics
fn print_simple_summary(
    total_urls: i32,
    successful_urls: i32,
    failed_urls: i32,
    elapsed_seconds: f64,
) {
    info!(
        "✅ Processed {} URL{} ({} succeeded, {} failed) in {:.1}s - see database for details",
        total_urls,
        if total_urls == 1 { "" } else { "s" },
        successful_urls,
        failed_urls,
        elapsed_seconds
    );
}

/// Prints timing statistics if enabled.
///
/// Optionally accepts flags to indicate whether GeoIP and WHOIS are enabled,
/// which will be displayed in the output when these features are disabled.
pub fn print_timing_statistics(
    timing_stats: &Arc<TimingStats>,
    geoip_enabled: Option<bool>,
    whois_enabled: Option<bool>,
) {
    timing_stats.log_summary(geoip_enabled, whois_enabled);
}

/// Prints error, warning, and info statistics to the log.
///
/// This function is used internally and in tests.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    let total_warnings = error_stats.total_warnings();
    let total_info = error_stats.total_info();

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    if total_warnings > 0 {
        info!("Warning Counts ({} total):", total_warnings);
        for warning_type in WarningType::iter() {
            let count = error_stats.get_warning_count(warning_type);
            if count > 0 {
                info!("   {}: {}", warning_type.as_str(), count);
            }
        }
    }

    if total_info > 0 {
        info!("Info Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = error_stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}
