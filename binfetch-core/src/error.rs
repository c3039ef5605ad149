//! Error types for tool resolution.
//!
//! Every failure carries structured context rather than a bare message.
//! Underlying errors are held in `Arc` so a memoized failure can be handed
//! to every caller of [`crate::ResolutionCache`] unchanged.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;

/// Errors that can occur while resolving a tool binary.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The host operating system has no entry in the tool's platform table.
    #[error("Unsupported platform: {platform}")]
    UnsupportedPlatform { platform: String },

    /// The host architecture is unmapped and the strict architecture policy is on.
    #[error("Unsupported architecture {arch} on {platform}")]
    UnsupportedArchitecture { platform: String, arch: String },

    /// The release server answered with a non-success status.
    #[error("Download failed with status {status}: {url}")]
    DownloadFailed { url: String, status: u16 },

    /// The archive could not be unpacked or did not contain the binary.
    #[error("Extraction failed for {}: {}", .filepath.display(), .stderr)]
    ExtractionFailed { filepath: PathBuf, stderr: String },

    /// The download URL was rejected before any request was made.
    #[error("Invalid download URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure (DNS, refused connection, broken body stream).
    #[error("Network error while fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl ResolveError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source: Arc::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_failed_message() {
        let err = ResolveError::DownloadFailed {
            url: "https://github.com/x".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Download failed with status 404: https://github.com/x"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = ResolveError::io(
            "Failed to create directory: /nope",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().starts_with("Failed to create directory"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_clone_shares_source() {
        let err = ResolveError::io("ctx", std::io::Error::other("boom"));
        let cloned = err.clone();
        match (err, cloned) {
            (ResolveError::Io { source: a, .. }, ResolveError::Io { source: b, .. }) => {
                assert!(Arc::ptr_eq(&a, &b));
            }
            _ => unreachable!(),
        }
    }
}
