//! Package record shared by every pipeline step

use super::Version;
use std::path::{Path, PathBuf};

/// File name of the package build script
pub const PKGBUILD: &str = "PKGBUILD";

/// File name of the generated package metadata
pub const SRCINFO: &str = ".SRCINFO";

/// Separator between a local file name and the actual URL in a source entry
/// (`foo.tar.gz::https://example.com/v1.tar.gz`)
const SOURCE_SEPARATOR: &str = "::";

/// A package directory together with its metadata.
///
/// Built once before the run. The check step fills in `upstream_version`
/// and `is_outdated`; later steps only read them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Absolute path of the package directory
    pub path: PathBuf,
    /// Package base name
    pub pkgbase: String,
    /// Names of the packages built from this base
    pub pkgnames: Vec<String>,
    /// Upstream project URL
    pub url: String,
    /// Currently packaged version
    pub pkgver: Version,
    /// Package release number
    pub pkgrel: String,
    /// Source entries, possibly in `name::url` form
    pub sources: Vec<String>,
    /// Whether the version is computed from a VCS checkout (`pkgver()`)
    pub is_vcs: bool,
    /// Latest upstream version, once checked
    pub upstream_version: Option<Version>,
    /// Whether the upstream version is newer than `pkgver`
    pub is_outdated: bool,
}

impl Package {
    /// Name used for display and version overrides
    pub fn name(&self) -> &str {
        &self.pkgbase
    }

    /// Path to the PKGBUILD
    pub fn pkgbuild_path(&self) -> PathBuf {
        pkgbuild_path(&self.path)
    }

    /// Path to the .SRCINFO
    pub fn srcinfo_path(&self) -> PathBuf {
        srcinfo_path(&self.path)
    }

    /// URLs that may identify the upstream project: the `url` field first,
    /// then every source with its `name::` prefix removed.
    pub fn candidate_urls(&self) -> Vec<&str> {
        std::iter::once(self.url.as_str())
            .chain(self.sources.iter().map(|source| {
                source
                    .split_once(SOURCE_SEPARATOR)
                    .map_or(source.as_str(), |(_, url)| url)
            }))
            .collect()
    }
}

/// Path to the PKGBUILD inside a package directory
pub fn pkgbuild_path(dir: &Path) -> PathBuf {
    dir.join(PKGBUILD)
}

/// Path to the .SRCINFO inside a package directory
pub fn srcinfo_path(dir: &Path) -> PathBuf {
    dir.join(SRCINFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_urls_strips_source_labels() {
        let pkg = Package {
            url: "https://github.com/bcyran/timewall".to_string(),
            sources: vec![
                "https://fake.source/archive.tar.gz".to_string(),
                "baz.tar.gz::https://foo.bar/v1.tar.gz".to_string(),
            ],
            ..Default::default()
        };

        assert_eq!(
            pkg.candidate_urls(),
            vec![
                "https://github.com/bcyran/timewall",
                "https://fake.source/archive.tar.gz",
                "https://foo.bar/v1.tar.gz",
            ]
        );
    }

    #[test]
    fn test_candidate_urls_without_sources() {
        let pkg = Package {
            url: "https://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(pkg.candidate_urls(), vec!["https://example.com"]);
    }

    #[test]
    fn test_package_file_paths() {
        let pkg = Package {
            path: PathBuf::from("/pkgs/foo"),
            ..Default::default()
        };
        assert_eq!(pkg.pkgbuild_path(), PathBuf::from("/pkgs/foo/PKGBUILD"));
        assert_eq!(pkg.srcinfo_path(), PathBuf::from("/pkgs/foo/.SRCINFO"));
    }
}
