//! Run metadata insertion.
//!
//! This module handles inserting and updating run-level metadata and statistics.

use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;

/// Metadata for a scan run, recorded at start.
pub struct RunMetadata<'a> {
    pub run_id: &'a str,
    pub start_time_ms: i64,
    pub version: &'a str,
    pub fingerprints_source: Option<&'a str>,
    pub fingerprints_version: Option<&'a str>,
    pub geoip_version: Option<&'a str>,
}

/// Statistics for a completed scan run, recorded at end.
pub struct RunStats<'a> {
    pub run_id: &'a str,
    pub total_urls: i32,
    pub successful_urls: i32,
    pub failed_urls: i32,
    pub elapsed_seconds: f64,
}

/// Inserts or updates run metadata in the runs table.
///
/// This should be called at the start of a run to record run-level information
/// like application version, fingerprints_source, fingerprints_version, and geoip_version.
pub async fn insert_run_metadata(
    pool: &SqlitePool,
    meta: &RunMetadata<'_>,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO runs (run_id, version, fingerprints_source, fingerprints_version, geoip_version, start_time_ms)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(run_id) DO UPDATE SET
             version=excluded.version,
             fingerprints_source=excluded.fingerprints_source,
             fingerprints_version=excluded.fingerprints_version,
             geoip_version=excluded.geoip_version,
             start_time_ms=excluded.start_time_ms",
    )
    .bind(meta.run_id)
    .bind(meta.version)
    .bind(meta.fingerprints_source)
    .bind(meta.fingerprints_version)
    .bind(meta.geoip_version)
    .bind(meta.start_time_ms)
    .execute(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(())
}

/// Updates run statistics when a run completes.
///
/// Stores all statistics from a ScanReport including elapsed time for easy querying.
pub async fn update_run_stats(
    pool: &SqlitePool,
    stats: &RunStats<'_>,
) -> Result<(), DatabaseError> {
    let end_time_ms = chrono::Utc::now().timestamp_millis();

    sqlx::query(
        "UPDATE runs
         SET end_time_ms = ?, total_urls = ?, successful_urls = ?, failed_urls = ?, elapsed_seconds = ?
         WHERE run_id = ?",
    )
    .bind(end_time_ms)
    .bind(stats.total_urls)
    .bind(stats.successful_urls)
    .bind(stats.failed_urls)
    .bind(stats.elapsed_seconds)
    .bind(stats.run_id)
    .execute(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(())
}

/// Query run history from the database.
///
/// Returns all completed runs sorted by start_time_ms (most recent first).
/// Useful for reviewing past scan results after closing the terminal.
///
/// # Example
///
/// ```no_run
/// use domain_status::query_run_history;
/// use sqlx::SqlitePool;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = SqlitePool::connect("sqlite:./domain_status.db").await?;
/// let runs = query_run_history(&pool, Some(10)).await?;
/// for run in runs {
///     println!("Run {}: {} URLs ({} succeeded, {} failed) in {:.1}s",
///              run.run_id, run.total_urls, run.successful_urls,
///              run.failed_urls, run.elapsed_seconds.unwrap_or(0.0));
/// }
/// # Ok(())
/// # }
/// ```
pub async fn query_run_history(
    pool: &SqlitePool,
    limit: Option<usize>,
) -> Result<Vec<RunSummary>, DatabaseError> {
    let query = if let Some(limit) = limit {
        format!(
            "SELECT run_id, version, start_time_ms, end_time_ms, total_urls, successful_urls, failed_urls, elapsed_seconds
             FROM runs
             WHERE end_time_ms IS NOT NULL
             ORDER BY start_time_ms DESC
             LIMIT {}",
            limit
        )
    } else {
        "SELECT run_id, version, start_time_ms, end_time_ms, total_urls, successful_urls, failed_urls, elapsed_seconds
         FROM runs
         WHERE end_time_ms IS NOT NULL
         ORDER BY start_time_ms DESC"
            .to_string()
    };

    let rows = sqlx::query(&query)
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::SqlError)?;

    let summaries: Vec<RunSummary> = rows
        .into_iter()
        .map(|row| RunSummary {
            run_id: row.get("run_id"),
            version: row.get("version"),
            start_time_ms: row.get("start_time_ms"),
            end_time_ms: row.get("end_time_ms"),
            total_urls: row.get("total_urls"),
            successful_urls: row.get("successful_urls"),
            failed_urls: row.get("failed_urls"),
            elapsed_seconds: row.get("elapsed_seconds"),
        })
        .collect();

    Ok(summaries)
}

/// Summary of a completed run, suitable for displaying run history.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Unique identifier for this run (e.g., "run_1765150444953").
    pub run_id: String,
    /// Application version that ran this scan (e.g., "0.1.4").
    pub version: Option<String>,
    /// Start time as milliseconds since Unix epoch.
    pub start_time_ms: i64,
    /// End time as milliseconds since Unix epoch (None if run still in progress).
    pub end_time_ms: Option<i64>,
    /// Total number of URLs processed in this run.
    pub total_urls: i32,
    /// Number of URLs that were successfully processed.
    pub successful_urls: i32,
    /// Number of URLs that failed to process.
    pub failed_urls: i32,
    /// Total execution time in seconds (None if run still in progress).
    pub elapsed_seconds: Option<f64>,
}
