//! Archive extraction for downloaded releases.
//!
//! Both formats honor the same contract: given an archive and the name of the
//! binary inside it, return the binary's bytes. Nothing is written to the
//! final install location here.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use super::error::{ResolveError, Result};
use super::types::ArchiveFormat;

/// Upper bound on the buffer reserved from a zip entry's declared size.
const MAX_PREALLOC_BYTES: u64 = 64 << 20;

/// Program used to unpack tar.gz archives.
const TAR_PROGRAM: &str = "tar";

/// Extracts `entry_name` from `archive_path`.
///
/// `target` is the final install path; it is only used for diagnostics on the
/// tar.gz path. `work_dir` hosts the private staging directory `tar` unpacks
/// into.
///
/// # Errors
///
/// Returns [`ResolveError::ExtractionFailed`] when the archive cannot be read
/// or does not contain `entry_name`.
pub async fn extract_binary(
    format: ArchiveFormat,
    archive_path: &Path,
    entry_name: &str,
    target: &Path,
    work_dir: &Path,
) -> Result<Vec<u8>> {
    info!(
        "Extracting {} from {:?} archive {}",
        entry_name,
        format,
        archive_path.display()
    );

    match format {
        ArchiveFormat::TarGz => {
            extract_tar_gz(TAR_PROGRAM, archive_path, entry_name, target, work_dir).await
        }
        ArchiveFormat::Zip => {
            let archive_path = archive_path.to_path_buf();
            let entry_name = entry_name.to_string();
            tokio::task::spawn_blocking(move || extract_zip(&archive_path, &entry_name))
                .await
                .map_err(|e| {
                    ResolveError::io("Zip extraction task failed", std::io::Error::other(e))
                })?
        }
    }
}

// ============================================================================
// TAR.GZ Extraction
// ============================================================================

async fn extract_tar_gz(
    program: &str,
    archive_path: &Path,
    entry_name: &str,
    target: &Path,
    work_dir: &Path,
) -> Result<Vec<u8>> {
    let failed = |stderr: String| ResolveError::ExtractionFailed {
        filepath: target.to_path_buf(),
        stderr,
    };

    // Removed on drop, whichever way this function returns.
    let staging = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(work_dir)
        .map_err(|e| {
            ResolveError::io(
                format!("Failed to create staging directory in {}", work_dir.display()),
                e,
            )
        })?;
    debug!("Staging tar extraction in {}", staging.path().display());

    let output = Command::new(program)
        .arg("-xzf")
        .arg(archive_path)
        .arg("-C")
        .arg(staging.path())
        .arg(entry_name)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| failed(format!("Failed to run {}: {}", program, e)))?;

    if !output.status.success() {
        return Err(failed(String::from_utf8_lossy(&output.stderr).into_owned()));
    }

    let extracted: PathBuf = staging.path().join(entry_name);
    let bytes = tokio::fs::read(&extracted)
        .await
        .map_err(|e| failed(format!("{} missing after extraction: {}", entry_name, e)))?;

    debug!("Extracted {} bytes from tar.gz", bytes.len());
    Ok(bytes)
}

// ============================================================================
// ZIP Extraction
// ============================================================================

fn extract_zip(archive_path: &Path, entry_name: &str) -> Result<Vec<u8>> {
    let failed = |stderr: String| ResolveError::ExtractionFailed {
        filepath: archive_path.to_path_buf(),
        stderr,
    };

    let file = File::open(archive_path)
        .map_err(|e| failed(format!("Failed to open zip: {}", e)))?;

    // The archive (and the file handle inside it) is closed when it drops,
    // on every return path below.
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| failed(format!("Failed to read zip: {}", e)))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| failed(format!("Failed to read zip entry {}: {}", i, e)))?;

        // Exact, case-sensitive match on the stored name.
        if entry.name() != entry_name {
            continue;
        }

        // The declared size comes from the archive and is only a hint.
        let mut bytes = Vec::with_capacity(prealloc_hint(entry.size()));
        entry.read_to_end(&mut bytes).map_err(|e| {
            failed(format!(
                "Failed to extract {} from zip archive: {}",
                entry_name, e
            ))
        })?;

        debug!("Extracted {} bytes from zip", bytes.len());
        return Ok(bytes);
    }

    Err(failed(format!("{} not found in zip archive", entry_name)))
}

fn prealloc_hint(declared_size: u64) -> usize {
    declared_size.min(MAX_PREALLOC_BYTES) as usize
}
