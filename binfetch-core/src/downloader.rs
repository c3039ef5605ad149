//! Archive fetcher.
//!
//! Streams a release archive into a uniquely named temporary file inside the
//! cache directory. The temporary file is never the final binary name, and it
//! is removed automatically if the download does not complete.

use futures::StreamExt;
use std::net::IpAddr;
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::{Host, Url};

use super::error::{ResolveError, Result};
use super::types::DownloadCoordinate;

// ============================================================================
// URL Validation
// ============================================================================

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => domain.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(ip) => IpAddr::V4(*ip).is_loopback(),
        Host::Ipv6(ip) => IpAddr::V6(*ip).is_loopback(),
    }
}

/// Validates that a URL is safe for downloading.
///
/// HTTPS is required, except that loopback hosts may use plain HTTP.
fn validate_url(url_str: &str) -> Result<()> {
    let invalid = |reason: &str| ResolveError::InvalidUrl {
        url: url_str.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(url_str).map_err(|e| invalid(&e.to_string()))?;
    let host = url.host().ok_or_else(|| invalid("URL must have a host"))?;

    match url.scheme() {
        "https" => Ok(()),
        "http" if is_loopback(&host) => Ok(()),
        _ => Err(invalid("URL must use HTTPS")),
    }
}

// ============================================================================
// Download Progress
// ============================================================================

/// Progress information during a download.
#[derive(Debug, Clone, Copy)]
pub struct DownloadProgress {
    pub bytes_downloaded: u64,
    /// Total bytes expected (if known from Content-Length header).
    pub total_bytes: Option<u64>,
}

impl DownloadProgress {
    /// Progress percentage (0.0 to 100.0), or None if total is unknown.
    pub fn percent(&self) -> Option<f32> {
        self.total_bytes.map(|total| {
            if total > 0 {
                (self.bytes_downloaded as f32 / total as f32) * 100.0
            } else {
                0.0
            }
        })
    }
}

// ============================================================================
// Download Function
// ============================================================================

/// Downloads `coordinate` into a temporary file in `dir`.
///
/// Exactly one GET is issued; there are no retries. On success the returned
/// [`TempPath`] owns the archive and deletes it when dropped or closed.
///
/// # Errors
///
/// - [`ResolveError::InvalidUrl`] if the URL fails validation.
/// - [`ResolveError::Network`] if the request or body stream fails.
/// - [`ResolveError::DownloadFailed`] on any non-2xx status.
/// - [`ResolveError::Io`] if the temporary file cannot be written.
pub async fn download_archive(
    client: &reqwest::Client,
    coordinate: &DownloadCoordinate,
    dir: &Path,
) -> Result<TempPath> {
    let url = coordinate.url.as_str();
    validate_url(url)?;

    info!("Downloading {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ResolveError::network(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ResolveError::DownloadFailed {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let total_bytes = response.content_length();
    debug!("Content-Length: {:?}", total_bytes);

    let archive_path = tempfile::Builder::new()
        .prefix(&format!("{}.", coordinate.filename))
        .suffix(".download")
        .tempfile_in(dir)
        .map_err(|e| {
            ResolveError::io(
                format!("Failed to create temporary archive in {}", dir.display()),
                e,
            )
        })?
        .into_temp_path();

    let mut file = File::create(&archive_path).await.map_err(|e| {
        ResolveError::io(
            format!("Failed to open {}", archive_path.display()),
            e,
        )
    })?;

    let mut stream = response.bytes_stream();
    let mut progress = DownloadProgress {
        bytes_downloaded: 0,
        total_bytes,
    };

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ResolveError::network(url, e))?;
        file.write_all(&chunk).await.map_err(|e| {
            ResolveError::io(
                format!("Failed to write {}", archive_path.display()),
                e,
            )
        })?;

        progress.bytes_downloaded += chunk.len() as u64;
        if let Some(percent) = progress.percent() {
            debug!("{} download progress: {:.1}%", coordinate.filename, percent);
        }
    }

    file.flush().await.map_err(|e| {
        ResolveError::io(
            format!("Failed to flush {}", archive_path.display()),
            e,
        )
    })?;

    info!(
        "Download complete: {} bytes written to {}",
        progress.bytes_downloaded,
        archive_path.display()
    );

    Ok(archive_path)
}
