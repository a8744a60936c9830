//! Archive fetcher.
//!
//! Streams a remote compressed database archive to a uniquely named local
//! temporary file, reporting transfer progress through a callback. The
//! fetcher leaves a temp file behind only on success; the caller owns
//! cleanup of that file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::StreamExt;
use log::debug;
use tokio::io::AsyncWriteExt;

use crate::error_handling::FetchError;

/// Progress callback: invoked with values in `[0, 1]`, starting at 0. When
/// the response carries no usable `Content-Length`, progress stays at 0.
pub type ProgressFn = dyn Fn(f64) + Send + Sync;

// Distinguishes temp files across concurrent fetches within one process.
static FETCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Downloads `url` to a unique temporary file, streaming the body chunk by
/// chunk.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `url` - Archive URL
/// * `timeout` - Bound on the whole request, connect through last body byte
/// * `on_progress` - Progress callback, `[0, 1]`
///
/// # Errors
///
/// * `FetchError::Transfer` when the response status is outside 200-299
/// * `FetchError::Network` on transport failure or timeout
/// * `FetchError::Write` when the temporary file cannot be created or written
pub async fn fetch_archive(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    on_progress: &ProgressFn,
) -> Result<PathBuf, FetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::Network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Transfer {
            status: status.as_u16(),
        });
    }

    let dest = temp_destination(url);
    debug!("Downloading {} to {}", url, dest.display());

    match stream_to_file(response, &dest, on_progress).await {
        Ok(()) => Ok(dest),
        Err(e) => {
            // Never leave a partial temp file behind.
            let _ = tokio::fs::remove_file(&dest).await;
            Err(e)
        }
    }
}

async fn stream_to_file(
    response: reqwest::Response,
    dest: &Path,
    on_progress: &ProgressFn,
) -> Result<(), FetchError> {
    let total = response.content_length().unwrap_or(0);
    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(FetchError::Write)?;

    on_progress(0.0);

    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        file.write_all(&chunk).await.map_err(FetchError::Write)?;
        written += chunk.len() as u64;
        if total > 0 {
            on_progress((written as f64 / total as f64).min(1.0));
        }
    }

    file.flush().await.map_err(FetchError::Write)?;
    Ok(())
}

// Unique name under the system temp dir: archive stem + pid + sequence
// number, so concurrent fetches (and leftover files from crashed runs)
// never collide.
fn temp_destination(url: &str) -> PathBuf {
    let stem = url
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("archive");
    let seq = FETCH_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("{}.{}-{}", stem, std::process::id(), seq))
}
