//! Cache directory path management.
//!
//! Installed binaries live under the platform data directory:
//!
//! - Linux: `~/.local/share/binfetch/bin/`
//! - macOS: `~/Library/Application Support/binfetch/bin/`
//! - Windows: `C:\Users\<User>\AppData\Roaming\binfetch\bin\`
//!
//! Hosts without a data directory fall back to the OS temp folder.

use std::path::{Path, PathBuf};

/// Subdirectory name under the data directory.
const BINFETCH_DATA_DIR: &str = "binfetch";

/// Returns the base binfetch data directory.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(BINFETCH_DATA_DIR)
}

/// Returns the directory installed binaries are cached in.
///
/// Path: `{data}/binfetch/bin/`
pub fn get_bin_dir() -> PathBuf {
    get_data_dir().join("bin")
}

/// File name of a tool's executable on `os` (`fzf` or `fzf.exe`).
pub fn executable_name(name: &str, os: &str) -> String {
    if os == "windows" {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

/// Path a tool's binary is installed at inside `bin_dir`.
pub fn binary_path(bin_dir: &Path, name: &str, os: &str) -> PathBuf {
    bin_dir.join(executable_name(name, os))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_dir_is_under_data_dir() {
        let data = get_data_dir();
        let bin = get_bin_dir();
        assert!(bin.starts_with(&data));
        assert!(bin.ends_with("bin"));
        assert!(data.to_string_lossy().contains("binfetch"));
    }

    #[test]
    fn test_bin_dir_is_stable() {
        assert_eq!(get_bin_dir(), get_bin_dir());
    }

    #[test]
    fn test_executable_name() {
        assert_eq!(executable_name("fzf", "linux"), "fzf");
        assert_eq!(executable_name("fzf", "macos"), "fzf");
        assert_eq!(executable_name("fzf", "windows"), "fzf.exe");
    }

    #[test]
    fn test_binary_path() {
        let dir = Path::new("/cache/bin");
        assert_eq!(
            binary_path(dir, "fzf", "windows"),
            PathBuf::from("/cache/bin/fzf.exe")
        );
        assert_eq!(
            binary_path(dir, "fzf", "linux"),
            PathBuf::from("/cache/bin/fzf")
        );
    }
}
