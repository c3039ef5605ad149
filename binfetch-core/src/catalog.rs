//! Tool catalog with hardcoded definitions.
//!
//! Tool definitions are fixed at build time; nothing here is user supplied.

use super::types::{ArchiveFormat, PlatformEntry, ToolSpec};

// ============================================================================
// fzf Definition (fuzzy finder)
// ============================================================================

const FZF_VERSION: &str = "0.62.0";

const FZF_PLATFORMS: &[PlatformEntry] = &[
    PlatformEntry::new("linux", "linux", ArchiveFormat::TarGz, true),
    PlatformEntry::new("macos", "darwin", ArchiveFormat::TarGz, true),
    PlatformEntry::new("windows", "windows", ArchiveFormat::Zip, false),
];

const FZF_ARCHITECTURES: &[(&str, &str)] = &[("x86_64", "amd64"), ("aarch64", "arm64")];

/// fzf, published at `github.com/junegunn/fzf`.
pub const FZF: ToolSpec = ToolSpec {
    name: "fzf",
    version: FZF_VERSION,
    owner: "junegunn",
    platforms: FZF_PLATFORMS,
    architectures: FZF_ARCHITECTURES,
    default_arch: "amd64",
};

// ============================================================================
// Catalog Lookup
// ============================================================================

static ALL_TOOLS: &[&ToolSpec] = &[&FZF];

/// Returns all tool definitions in the catalog.
pub fn get_all_tool_specs() -> &'static [&'static ToolSpec] {
    ALL_TOOLS
}

/// Looks up a tool definition by name (case-insensitive).
pub fn get_tool_spec(name: &str) -> Option<&'static ToolSpec> {
    ALL_TOOLS
        .iter()
        .copied()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tool_spec() {
        assert_eq!(get_tool_spec("fzf").map(|s| s.version), Some(FZF_VERSION));
        assert!(get_tool_spec("FZF").is_some());
        assert!(get_tool_spec("ripgrep").is_none());
    }

    #[test]
    fn test_all_tools_have_platforms() {
        for spec in get_all_tool_specs() {
            assert!(!spec.platforms.is_empty(), "{} has no platforms", spec.name);
            assert!(!spec.default_arch.is_empty());
        }
    }

    #[test]
    fn test_fzf_windows_uses_zip_without_exec_bit() {
        let windows = FZF.platform("windows").unwrap();
        assert_eq!(windows.format, ArchiveFormat::Zip);
        assert!(!windows.executable_bit);

        let macos = FZF.platform("macos").unwrap();
        assert_eq!(macos.label, "darwin");
        assert_eq!(macos.format, ArchiveFormat::TarGz);
        assert!(macos.executable_bit);
    }
}
