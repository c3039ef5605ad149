//! Installs extracted binaries into the cache directory.
//!
//! The binary is written to a temporary sibling, made executable, and renamed
//! onto its final path, so the cache path only ever holds a complete binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, info, warn};

use super::error::{ResolveError, Result};

/// Writes `bytes` to `filepath`, setting the executable bit when asked.
///
/// # Errors
///
/// Returns [`ResolveError::Io`] if the binary cannot be written, made
/// executable, or moved into place.
pub async fn install_binary(bytes: Vec<u8>, filepath: &Path, executable_bit: bool) -> Result<()> {
    let filepath = filepath.to_path_buf();
    tokio::task::spawn_blocking(move || write_binary(&bytes, &filepath, executable_bit))
        .await
        .map_err(|e| ResolveError::io("Install task failed", std::io::Error::other(e)))?
}

fn write_binary(bytes: &[u8], filepath: &Path, executable_bit: bool) -> Result<()> {
    let dir = filepath
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut staged = NamedTempFile::new_in(&dir).map_err(|e| {
        ResolveError::io(
            format!("Failed to create temporary binary in {}", dir.display()),
            e,
        )
    })?;

    staged
        .write_all(bytes)
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| ResolveError::io(format!("Failed to write {}", filepath.display()), e))?;

    if executable_bit {
        make_executable(staged.path())?;
    }

    staged.persist(filepath).map_err(|e| {
        ResolveError::io(
            format!("Failed to move binary into place at {}", filepath.display()),
            e.error,
        )
    })?;

    info!("Installed {} ({} bytes)", filepath.display(), bytes.len());
    Ok(())
}

/// Sets executable permission on a file (Unix only).
///
/// On Windows, this is a no-op.
#[allow(unused_variables)]
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            ResolveError::io(format!("Failed to get metadata for {}", path.display()), e)
        })?;

        let mut permissions = metadata.permissions();
        permissions.set_mode(permissions.mode() | 0o755);

        fs::set_permissions(path, permissions).map_err(|e| {
            ResolveError::io(
                format!("Failed to set executable permission on {}", path.display()),
                e,
            )
        })?;

        debug!("Set executable permission on {}", path.display());
    }

    Ok(())
}

/// Deletes the downloaded archive. Failure is logged, not returned.
pub fn discard_archive(archive: TempPath) {
    let shown = archive.display().to_string();
    match archive.close() {
        Ok(()) => debug!("Removed temporary archive {}", shown),
        Err(e) => warn!("Failed to clean up archive {}: {}", shown, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_install_sets_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let filepath = temp_dir.path().join("fzf");

        install_binary(b"\x7fELF".to_vec(), &filepath, true)
            .await
            .unwrap();

        assert_eq!(fs::read(&filepath).unwrap(), b"\x7fELF");
        let mode = fs::metadata(&filepath).unwrap().permissions().mode();
        assert_ne!(mode & 0o100, 0, "owner exec bit missing: {:o}", mode);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_install_without_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let filepath = temp_dir.path().join("fzf.exe");

        install_binary(b"MZ".to_vec(), &filepath, false).await.unwrap();

        let mode = fs::metadata(&filepath).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
    }

    #[tokio::test]
    async fn test_install_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let filepath = temp_dir.path().join("fzf");
        fs::write(&filepath, b"old").unwrap();

        install_binary(b"new".to_vec(), &filepath, true).await.unwrap();

        assert_eq!(fs::read(&filepath).unwrap(), b"new");
        // No staging files left behind.
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_discard_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = NamedTempFile::new_in(temp_dir.path())
            .unwrap()
            .into_temp_path();
        let kept = archive.to_path_buf();
        assert!(kept.exists());

        discard_archive(archive);
        assert!(!kept.exists());
    }
}
