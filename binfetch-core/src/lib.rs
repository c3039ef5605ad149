//! Binfetch Core Library
//!
//! Guarantees, at first use, that a command-line tool binary is available on
//! the host. If the tool is neither on the search path nor in the cache
//! directory, a platform-appropriate release archive is downloaded, the binary
//! is extracted and installed into the cache, and its path is returned.
//!
//! # Architecture
//!
//! - `types`: Core types (ToolSpec, PlatformEntry, ArchiveFormat, Host)
//! - `catalog`: Static tool definitions
//! - `platform`: Host to archive format, release label and architecture tag
//! - `paths`: Cache directory resolution
//! - `presence`: Search-path and cache lookup
//! - `downloader`: Release archive download
//! - `extractor`: Archive extraction (tar.gz, zip)
//! - `installer`: Binary installation and archive cleanup
//! - `resolver`: The pipeline and its single-flight cache
//!
//! # Example
//!
//! ```ignore
//! use binfetch_core::{catalog, ResolutionCache, ResolverConfig, ToolResolver};
//!
//! let fzf = ResolutionCache::new(ToolResolver::new(&catalog::FZF, &ResolverConfig::from_env()));
//! let path = fzf.filepath().await?;
//! ```

pub mod catalog;
pub mod config;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod installer;
pub mod paths;
pub mod platform;
pub mod presence;
pub mod resolver;
pub mod types;

pub use catalog::{get_all_tool_specs, get_tool_spec};
pub use config::{ResolverConfig, SearchPath};
pub use error::{ResolveError, Result};
pub use platform::{describe, PlatformDescriptor, ResolvedArch};
pub use resolver::{ResolutionCache, ToolResolver};
pub use types::{ArchiveFormat, DownloadCoordinate, Host, PlatformEntry, ToolSpec};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
