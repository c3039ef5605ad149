//! Core types for tool resolution.
//!
//! This module defines the data model shared across the resolver: the static
//! tool definition, the host description, archive formats and the download
//! coordinate derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Archive Format
// ============================================================================

/// Archive format a tool release is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar archive (.tar.gz)
    TarGz,
    /// ZIP archive (.zip)
    Zip,
}

impl ArchiveFormat {
    /// File extension used in release filenames, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// One row of a tool's platform table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformEntry {
    /// Host operating system identifier (`std::env::consts::OS` values).
    pub os: &'static str,
    /// Platform label used in the release filename.
    pub label: &'static str,
    /// Archive format published for this platform.
    pub format: ArchiveFormat,
    /// Whether the installed binary needs its executable bit set.
    pub executable_bit: bool,
}

impl PlatformEntry {
    pub const fn new(
        os: &'static str,
        label: &'static str,
        format: ArchiveFormat,
        executable_bit: bool,
    ) -> Self {
        Self {
            os,
            label,
            format,
            executable_bit,
        }
    }
}

/// Complete, build-time definition of a tool binary.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    /// Base name of the executable (also the repository name).
    pub name: &'static str,
    /// Pinned release version, without the leading `v`.
    pub version: &'static str,
    /// Owner of the repository publishing the releases.
    pub owner: &'static str,
    /// Supported operating systems.
    pub platforms: &'static [PlatformEntry],
    /// Raw architecture identifier to release tag.
    pub architectures: &'static [(&'static str, &'static str)],
    /// Tag used when the host architecture is not in `architectures`.
    pub default_arch: &'static str,
}

impl ToolSpec {
    /// Returns the platform table entry for an operating system.
    pub fn platform(&self, os: &str) -> Option<&'static PlatformEntry> {
        self.platforms.iter().find(|entry| entry.os == os)
    }

    /// Returns the release tag for a raw architecture identifier, if mapped.
    pub fn arch_tag(&self, arch: &str) -> Option<&'static str> {
        self.architectures
            .iter()
            .find(|(raw, _)| *raw == arch)
            .map(|(_, tag)| *tag)
    }
}

// ============================================================================
// Host
// ============================================================================

/// Operating system and CPU architecture of the machine resolving a tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host {
    pub os: String,
    pub arch: String,
}

impl Host {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Describes the machine this process runs on.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

// ============================================================================
// Download Coordinate
// ============================================================================

/// Where a release archive lives and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCoordinate {
    pub url: String,
    pub filename: String,
}
