//! Platform descriptor: maps a host to archive format, release label and
//! architecture tag, and builds the download coordinate from them.
//!
//! Everything here is pure; no filesystem or network access happens.

use tracing::warn;

use super::error::{ResolveError, Result};
use super::paths::executable_name;
use super::types::{ArchiveFormat, DownloadCoordinate, Host, ToolSpec};

/// Default host serving release archives.
pub const DEFAULT_RELEASE_BASE: &str = "https://github.com";

/// Normalized architecture tag used in release filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedArch {
    pub tag: &'static str,
    /// True when the raw architecture was unmapped and the default tag was used.
    pub fell_back: bool,
}

/// What a tool looks like on a particular host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDescriptor {
    pub os: String,
    pub label: &'static str,
    pub format: ArchiveFormat,
    pub arch: ResolvedArch,
    pub executable_bit: bool,
}

/// Normalizes a raw architecture identifier.
///
/// Unmapped architectures fall back to `spec.default_arch` unless `strict`
/// is set, in which case `None` is returned.
pub fn resolve_arch(spec: &ToolSpec, arch: &str, strict: bool) -> Option<ResolvedArch> {
    match spec.arch_tag(arch) {
        Some(tag) => Some(ResolvedArch {
            tag,
            fell_back: false,
        }),
        None if strict => None,
        None => Some(ResolvedArch {
            tag: spec.default_arch,
            fell_back: true,
        }),
    }
}

/// Describes `spec` on `host`.
///
/// # Errors
///
/// - [`ResolveError::UnsupportedPlatform`] if the host OS has no table entry.
/// - [`ResolveError::UnsupportedArchitecture`] if `strict_arch` is set and the
///   host architecture is unmapped.
pub fn describe(spec: &ToolSpec, host: &Host, strict_arch: bool) -> Result<PlatformDescriptor> {
    let entry = spec
        .platform(&host.os)
        .ok_or_else(|| ResolveError::UnsupportedPlatform {
            platform: host.os.clone(),
        })?;

    let arch = resolve_arch(spec, &host.arch, strict_arch).ok_or_else(|| {
        ResolveError::UnsupportedArchitecture {
            platform: host.os.clone(),
            arch: host.arch.clone(),
        }
    })?;

    if arch.fell_back {
        warn!(
            "Unrecognized architecture {} for {}, falling back to {}",
            host.arch, spec.name, arch.tag
        );
    }

    Ok(PlatformDescriptor {
        os: host.os.clone(),
        label: entry.label,
        format: entry.format,
        arch,
        executable_bit: entry.executable_bit,
    })
}

impl PlatformDescriptor {
    /// Name of the binary inside the release archive.
    pub fn entry_name(&self, spec: &ToolSpec) -> String {
        executable_name(spec.name, &self.os)
    }

    /// Builds the release URL and filename.
    ///
    /// Shape: `<base>/<owner>/<tool>/releases/download/v<version>/<tool>-<version>-<label>_<arch>.<ext>`
    pub fn coordinate(&self, spec: &ToolSpec, release_base: &str) -> DownloadCoordinate {
        let filename = format!(
            "{}-{}-{}_{}.{}",
            spec.name,
            spec.version,
            self.label,
            self.arch.tag,
            self.format.extension()
        );
        let url = format!(
            "{}/{}/{}/releases/download/v{}/{}",
            release_base.trim_end_matches('/'),
            spec.owner,
            spec.name,
            spec.version,
            filename
        );
        DownloadCoordinate { url, filename }
    }
}
