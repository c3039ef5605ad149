//! Runtime configuration for the resolver.
//!
//! Tool definitions are compiled in (see [`crate::catalog`]); this only covers
//! where things live and how strict resolution is. The struct is serde-ready
//! so host applications can embed it in their own settings file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::paths;
use super::platform::DEFAULT_RELEASE_BASE;

/// Environment variable overriding the cache directory.
pub const ENV_CACHE_DIR: &str = "BINFETCH_CACHE_DIR";
/// Environment variable overriding the release host.
pub const ENV_RELEASE_BASE: &str = "BINFETCH_RELEASE_BASE";
/// Environment variable disabling the search-path lookup when non-empty.
pub const ENV_SKIP_PATH: &str = "BINFETCH_SKIP_PATH";
/// Environment variable enabling the strict architecture policy when non-empty.
pub const ENV_STRICT_ARCH: &str = "BINFETCH_STRICT_ARCH";

/// Where to look for an already-installed tool before the cache.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPath {
    /// Use the process `PATH`.
    #[default]
    Inherit,
    /// Use this `PATH`-formatted list instead.
    Custom(String),
    /// Skip the search path and go straight to the cache.
    Disabled,
}

/// Resolver settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Cache directory override. Defaults to [`paths::get_bin_dir`].
    pub cache_dir: Option<PathBuf>,

    /// Release host override, e.g. a mirror. Defaults to `https://github.com`.
    pub release_base: Option<String>,

    pub search_path: SearchPath,

    /// Fail on unmapped architectures instead of using the default tag.
    pub strict_arch: bool,
}

impl ResolverConfig {
    /// Builds a config from `BINFETCH_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            cache_dir: non_empty(ENV_CACHE_DIR).map(PathBuf::from),
            release_base: non_empty(ENV_RELEASE_BASE),
            search_path: if non_empty(ENV_SKIP_PATH).is_some() {
                SearchPath::Disabled
            } else {
                SearchPath::Inherit
            },
            strict_arch: non_empty(ENV_STRICT_ARCH).is_some(),
        }
    }

    /// Effective cache directory, always absolute.
    pub fn effective_cache_dir(&self) -> PathBuf {
        let dir = self.cache_dir.clone().unwrap_or_else(paths::get_bin_dir);
        std::path::absolute(&dir).unwrap_or(dir)
    }

    /// Effective release host.
    pub fn effective_release_base(&self) -> &str {
        self.release_base.as_deref().unwrap_or(DEFAULT_RELEASE_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.search_path, SearchPath::Inherit);
        assert!(!config.strict_arch);
        assert_eq!(config.effective_release_base(), "https://github.com");
        assert_eq!(config.effective_cache_dir(), paths::get_bin_dir());
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = ResolverConfig::from_lookup(lookup_from(&[
            (ENV_CACHE_DIR, "/opt/cache"),
            (ENV_RELEASE_BASE, "https://mirror.example.com"),
            (ENV_SKIP_PATH, "1"),
            (ENV_STRICT_ARCH, "yes"),
        ]));

        assert_eq!(config.cache_dir, Some(PathBuf::from("/opt/cache")));
        assert_eq!(config.effective_release_base(), "https://mirror.example.com");
        assert_eq!(config.search_path, SearchPath::Disabled);
        assert!(config.strict_arch);
    }

    #[test]
    fn test_from_lookup_ignores_empty_values() {
        let config = ResolverConfig::from_lookup(lookup_from(&[
            (ENV_CACHE_DIR, ""),
            (ENV_SKIP_PATH, "  "),
        ]));
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_relative_cache_dir_becomes_absolute() {
        let config = ResolverConfig {
            cache_dir: Some(PathBuf::from("relative/bin")),
            ..Default::default()
        };
        let dir = config.effective_cache_dir();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("relative/bin"));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{ "search_path": { "custom": "/usr/bin" } }"#).unwrap();
        assert_eq!(config.search_path, SearchPath::Custom("/usr/bin".to_string()));
        assert!(config.cache_dir.is_none());

        let config: ResolverConfig =
            serde_json::from_str(r#"{ "search_path": "disabled", "strict_arch": true }"#)
                .unwrap();
        assert_eq!(config.search_path, SearchPath::Disabled);
        assert!(config.strict_arch);
    }
}
