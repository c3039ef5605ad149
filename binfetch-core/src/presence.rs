//! Local presence check.
//!
//! A tool counts as present if the search path yields an executable of that
//! name (first found wins, no version check) or if the cached binary exists.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::config::SearchPath;

/// Looks `name` up on the search path.
pub fn find_on_search_path(name: &str, search_path: &SearchPath) -> Option<PathBuf> {
    let found = match search_path {
        SearchPath::Disabled => return None,
        SearchPath::Inherit => which::which(name),
        SearchPath::Custom(paths) => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            which::which_in(name, Some(paths), cwd)
        }
    };

    match found {
        Ok(path) => {
            info!("Found {} on search path at {}", name, path.display());
            Some(path)
        }
        Err(e) => {
            debug!("{} not on search path: {}", name, e);
            None
        }
    }
}

/// Returns `filepath` if a cached binary already exists there.
pub async fn find_in_cache(filepath: &Path) -> Option<PathBuf> {
    match tokio::fs::try_exists(filepath).await {
        Ok(true) => {
            info!("Found cached binary at {}", filepath.display());
            Some(filepath.to_path_buf())
        }
        _ => None,
    }
}

/// Runs both checks in order.
pub async fn find_existing(
    name: &str,
    search_path: &SearchPath,
    cache_filepath: &Path,
) -> Option<PathBuf> {
    if let Some(path) = find_on_search_path(name, search_path) {
        return Some(path);
    }
    find_in_cache(cache_filepath).await
}
