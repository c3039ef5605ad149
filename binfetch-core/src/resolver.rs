//! Tool resolution pipeline and its in-process cache.
//!
//! [`ToolResolver`] runs presence check, platform description, download,
//! extraction and installation. [`ResolutionCache`] wraps one resolver and
//! guarantees the pipeline runs at most once per process, handing every
//! caller the same path or the same error.

use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::info;

use super::config::{ResolverConfig, SearchPath};
use super::downloader::download_archive;
use super::error::{ResolveError, Result};
use super::extractor::extract_binary;
use super::installer::{discard_archive, install_binary};
use super::paths::binary_path;
use super::platform::{describe, PlatformDescriptor};
use super::presence::find_existing;
use super::types::{DownloadCoordinate, Host, ToolSpec};

// ============================================================================
// Tool Resolver
// ============================================================================

/// Resolves one tool to an executable path, downloading it if needed.
#[derive(Debug, Clone)]
pub struct ToolResolver {
    spec: &'static ToolSpec,
    host: Host,
    cache_dir: PathBuf,
    release_base: String,
    search_path: SearchPath,
    strict_arch: bool,
    client: reqwest::Client,
}

impl ToolResolver {
    /// Creates a resolver for `spec` on the current host.
    pub fn new(spec: &'static ToolSpec, config: &ResolverConfig) -> Self {
        Self {
            spec,
            host: Host::current(),
            cache_dir: config.effective_cache_dir(),
            release_base: config.effective_release_base().to_string(),
            search_path: config.search_path.clone(),
            strict_arch: config.strict_arch,
            client: reqwest::Client::new(),
        }
    }

    /// Resolves as if running on `host`.
    pub fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    /// Uses a preconfigured HTTP client (proxies, timeouts, user agent).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn spec(&self) -> &'static ToolSpec {
        self.spec
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn release_base(&self) -> &str {
        &self.release_base
    }

    /// Where the binary is (or will be) installed in the cache.
    pub fn cache_filepath(&self) -> PathBuf {
        binary_path(&self.cache_dir, self.spec.name, &self.host.os)
    }

    /// Platform descriptor for this resolver's host.
    pub fn descriptor(&self) -> Result<PlatformDescriptor> {
        describe(self.spec, &self.host, self.strict_arch)
    }

    /// Download coordinate for this resolver's host.
    pub fn coordinate(&self) -> Result<DownloadCoordinate> {
        Ok(self.descriptor()?.coordinate(self.spec, &self.release_base))
    }

    /// Runs the full pipeline once, without memoization.
    ///
    /// The search path and cache are always checked before any network
    /// access. The downloaded archive is removed after extraction whether or
    /// not extraction succeeded.
    pub async fn resolve(&self) -> Result<PathBuf> {
        let filepath = self.cache_filepath();

        if let Some(existing) = find_existing(self.spec.name, &self.search_path, &filepath).await {
            return Ok(existing);
        }

        let descriptor = self.descriptor()?;
        let coordinate = descriptor.coordinate(self.spec, &self.release_base);
        info!(
            "{} not found, installing v{} for {}",
            self.spec.name, self.spec.version, self.host
        );

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| {
                ResolveError::io(
                    format!("Failed to create directory: {}", self.cache_dir.display()),
                    e,
                )
            })?;

        let archive = download_archive(&self.client, &coordinate, &self.cache_dir).await?;

        let extracted = extract_binary(
            descriptor.format,
            &archive,
            &descriptor.entry_name(self.spec),
            &filepath,
            &self.cache_dir,
        )
        .await;
        discard_archive(archive);
        let bytes = extracted?;

        install_binary(bytes, &filepath, descriptor.executable_bit).await?;

        info!(
            "{} v{} installed at {}",
            self.spec.name,
            self.spec.version,
            filepath.display()
        );
        Ok(filepath)
    }
}

// ============================================================================
// Resolution Cache
// ============================================================================

/// Single-flight, process-lifetime memo of a [`ToolResolver`] outcome.
///
/// Concurrent callers that arrive while the first resolution is in flight
/// wait for it. Failures are memoized like successes and are never retried
/// within the same cache; a fresh attempt needs a fresh `ResolutionCache`.
///
/// Construct it once and share it (e.g. in an `Arc`) with everything that
/// needs the tool.
#[derive(Debug)]
pub struct ResolutionCache {
    resolver: ToolResolver,
    outcome: OnceCell<Result<PathBuf>>,
}

impl ResolutionCache {
    pub fn new(resolver: ToolResolver) -> Self {
        Self {
            resolver,
            outcome: OnceCell::new(),
        }
    }

    /// Returns the path usable to invoke the tool.
    pub async fn filepath(&self) -> Result<PathBuf> {
        self.outcome
            .get_or_init(|| self.resolver.resolve())
            .await
            .clone()
    }

    /// The memoized outcome, if resolution has finished.
    pub fn outcome(&self) -> Option<&Result<PathBuf>> {
        self.outcome.get()
    }

    pub fn resolver(&self) -> &ToolResolver {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FZF;
    use tempfile::TempDir;

    fn offline_config(cache_dir: &Path) -> ResolverConfig {
        ResolverConfig {
            cache_dir: Some(cache_dir.to_path_buf()),
            // Nothing listens on the discard port; any request would fail.
            release_base: Some("http://127.0.0.1:9".to_string()),
            search_path: SearchPath::Disabled,
            strict_arch: false,
        }
    }

    #[test]
    fn test_cache_filepath_depends_on_os() {
        let temp_dir = TempDir::new().unwrap();
        let config = offline_config(temp_dir.path());

        let linux = ToolResolver::new(&FZF, &config).with_host(Host::new("linux", "x86_64"));
        let windows =
            ToolResolver::new(&FZF, &config).with_host(Host::new("windows", "x86_64"));

        assert_eq!(linux.cache_filepath(), temp_dir.path().join("fzf"));
        assert_eq!(windows.cache_filepath(), temp_dir.path().join("fzf.exe"));
    }

    #[test]
    fn test_two_resolvers_converge_on_same_path() {
        let temp_dir = TempDir::new().unwrap();
        let config = offline_config(temp_dir.path());
        let a = ToolResolver::new(&FZF, &config);
        let b = ToolResolver::new(&FZF, &config);
        assert_eq!(a.cache_filepath(), b.cache_filepath());
        assert!(a.cache_filepath().is_absolute());
    }

    #[test]
    fn test_coordinate_uses_release_base() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = ToolResolver::new(&FZF, &offline_config(temp_dir.path()))
            .with_host(Host::new("linux", "aarch64"));
        let coord = resolver.coordinate().unwrap();
        assert_eq!(
            coord.url,
            "http://127.0.0.1:9/junegunn/fzf/releases/download/v0.62.0/fzf-0.62.0-linux_arm64.tar.gz"
        );
    }

    #[tokio::test]
    async fn test_cached_binary_short_circuits() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = ToolResolver::new(&FZF, &offline_config(temp_dir.path()))
            .with_host(Host::new("linux", "x86_64"));
        std::fs::write(resolver.cache_filepath(), b"cached").unwrap();

        let path = resolver.resolve().await.unwrap();
        assert_eq!(path, resolver.cache_filepath());
        assert_eq!(std::fs::read(&path).unwrap(), b"cached");
    }

    #[tokio::test]
    async fn test_unsupported_platform_is_memoized() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = ToolResolver::new(&FZF, &offline_config(temp_dir.path()))
            .with_host(Host::new("solaris", "sparc64"));
        let cache = ResolutionCache::new(resolver);

        assert!(cache.outcome().is_none());
        let first = cache.filepath().await.unwrap_err();
        let second = cache.filepath().await.unwrap_err();

        for err in [first, second] {
            match err {
                ResolveError::UnsupportedPlatform { platform } => {
                    assert_eq!(platform, "solaris")
                }
                other => panic!("expected UnsupportedPlatform, got {:?}", other),
            }
        }
        assert!(matches!(cache.outcome(), Some(Err(_))));
    }

    #[tokio::test]
    async fn test_network_failure_is_memoized_and_distinct() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = ToolResolver::new(&FZF, &offline_config(temp_dir.path()))
            .with_host(Host::new("linux", "x86_64"));
        let cache = ResolutionCache::new(resolver);

        let err = cache.filepath().await.unwrap_err();
        assert!(matches!(err, ResolveError::Network { .. }), "{:?}", err);

        // A binary appearing later does not change the memoized outcome.
        std::fs::write(cache.resolver().cache_filepath(), b"late").unwrap();
        assert!(cache.filepath().await.is_err());
    }
}
