//! Archive installer: extract, validate, atomically install.
//!
//! Two responsibilities, composed sequentially by the lifecycle manager:
//!
//! 1. **Extract** - gunzip the downloaded archive. The feed serves a
//!    gzip-compressed single file, but tar.gz archives containing the
//!    database filename are also accepted (some mirrors repackage).
//! 2. **Validate + install** - the geo codec must open the extracted file;
//!    then a same-directory temp file is renamed over the target. The rename
//!    is what guarantees a concurrent reader sees either the old complete
//!    file or the new complete file, never a partial one.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flate2::read::GzDecoder;
use log::{debug, info};
use tar::Archive;

use crate::codec::GeoCodec;
use crate::error_handling::InstallError;

// Offset and magic of the ustar header in a tar stream.
const TAR_MAGIC_OFFSET: usize = 257;
const TAR_MAGIC: &[u8] = b"ustar";

static STAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Extracts, validates, and installs downloaded database archives.
pub struct ArchiveInstaller {
    codec: Arc<dyn GeoCodec>,
    db_filename: String,
}

impl ArchiveInstaller {
    /// Creates an installer that validates through `codec` and looks for
    /// `db_filename` inside tar archives.
    pub fn new(codec: Arc<dyn GeoCodec>, db_filename: &str) -> Self {
        Self {
            codec,
            db_filename: db_filename.to_string(),
        }
    }

    /// Decompresses `archive` next to it and returns the decompressed file's
    /// path.
    ///
    /// # Errors
    ///
    /// * `InstallError::Extraction` when the gzip stream is malformed
    /// * `InstallError::FileNotFoundInArchive` when the archive is a tar but
    ///   no member matches the expected database filename
    /// * `InstallError::Install` when the decompressed file cannot be written
    pub fn extract(&self, archive: &Path) -> Result<PathBuf, InstallError> {
        let compressed = std::fs::File::open(archive)?;
        let mut decoder = GzDecoder::new(compressed);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| InstallError::Extraction(e.to_string()))?;

        let db_bytes = if looks_like_tar(&decompressed) {
            self.member_from_tar(&decompressed)?
        } else {
            decompressed
        };

        // Drop the .gz suffix; fall back to a fixed name for odd inputs
        let dest = match archive.extension() {
            Some(_) => archive.with_extension(""),
            None => archive.with_file_name(&self.db_filename),
        };
        std::fs::write(&dest, &db_bytes)?;
        debug!(
            "Extracted {} ({} bytes) from {}",
            dest.display(),
            db_bytes.len(),
            archive.display()
        );
        Ok(dest)
    }

    /// Confirms the extracted file parses as a geolocation database.
    pub fn validate(&self, extracted: &Path) -> Result<(), InstallError> {
        match self.codec.open(extracted) {
            Some(_) => Ok(()),
            None => Err(InstallError::Validation),
        }
    }

    /// Atomically installs `source` as `target`.
    ///
    /// The file is first copied to a staging name inside the target's
    /// directory, then renamed over the target. Rename within one directory
    /// is atomic on POSIX filesystems, so an open reader keeps its old
    /// complete file and the path flips to the new complete file in one step.
    /// The staging file is removed on every failure path.
    pub fn install(&self, source: &Path, target: &Path) -> Result<(), InstallError> {
        let parent = target.parent().ok_or_else(|| {
            InstallError::Install(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "install target has no parent directory",
            ))
        })?;
        std::fs::create_dir_all(parent)?;

        let stage = parent.join(format!(
            ".{}.stage-{}-{}",
            self.db_filename,
            std::process::id(),
            STAGE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(e) = std::fs::copy(source, &stage) {
            let _ = std::fs::remove_file(&stage);
            return Err(InstallError::Install(e));
        }
        if let Err(e) = std::fs::rename(&stage, target) {
            let _ = std::fs::remove_file(&stage);
            return Err(InstallError::Install(e));
        }

        info!("Installed database at {}", target.display());
        Ok(())
    }

    fn member_from_tar(&self, tar_bytes: &[u8]) -> Result<Vec<u8>, InstallError> {
        let mut archive = Archive::new(tar_bytes);
        let entries = archive
            .entries()
            .map_err(|e| InstallError::Extraction(e.to_string()))?;

        for entry in entries {
            let mut entry = entry.map_err(|e| InstallError::Extraction(e.to_string()))?;
            let path = entry
                .path()
                .map_err(|e| InstallError::Extraction(e.to_string()))?;
            // file_name comparison deliberately ignores leading directories
            // (archives often nest the database under a dated folder)
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n == self.db_filename);
            if matches {
                let mut bytes = Vec::new();
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|e| InstallError::Extraction(e.to_string()))?;
                return Ok(bytes);
            }
        }

        Err(InstallError::FileNotFoundInArchive(
            self.db_filename.clone(),
        ))
    }
}

fn looks_like_tar(bytes: &[u8]) -> bool {
    bytes.len() > TAR_MAGIC_OFFSET + TAR_MAGIC.len()
        && &bytes[TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()] == TAR_MAGIC
}
