//! Package directory detection
//!
//! Features:
//! - Validates that a directory holds both PKGBUILD and .SRCINFO
//! - Builds a [`Package`] from the .SRCINFO metadata
//! - Walks subdirectories up to a given depth to collect several packages

use super::srcinfo::read_srcinfo;
use crate::domain::{pkgbuild_path, srcinfo_path, Package, Version, PKGBUILD, SRCINFO};
use crate::error::PackageError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Marker of a PKGBUILD that computes its version from a VCS checkout
const VCS_MARKER: &str = "pkgver()";

/// Load the package stored in the given directory
pub fn load_package(path: &Path) -> Result<Package, PackageError> {
    validate_is_dir(path)?;
    validate_is_package(path)?;

    let srcinfo = read_srcinfo(&srcinfo_path(path))?;
    let pkgbuild_file = pkgbuild_path(path);
    let pkgbuild =
        std::fs::read_to_string(&pkgbuild_file).map_err(|e| PackageError::io(&pkgbuild_file, e))?;
    let path = std::path::absolute(path).map_err(|e| PackageError::io(path, e))?;

    Ok(Package {
        path,
        pkgbase: srcinfo.pkgbase,
        pkgnames: srcinfo.pkgnames,
        url: srcinfo.url,
        pkgver: Version::new(srcinfo.pkgver),
        pkgrel: srcinfo.pkgrel,
        sources: srcinfo.sources,
        is_vcs: pkgbuild.contains(VCS_MARKER),
        upstream_version: None,
        is_outdated: false,
    })
}

/// Collect packages from the given directory.
///
/// A directory that is itself a package yields only that package. Otherwise
/// its non-hidden subdirectories are searched in name order, descending at
/// most `depth` levels. Directories that fail to load are skipped.
pub fn collect_packages(path: &Path, depth: usize) -> Result<Vec<Package>, PackageError> {
    if !path.exists() {
        return Err(PackageError::invalid_path(
            path,
            "doesn't exist or not accessible",
        ));
    }
    if !path.is_dir() {
        return Err(PackageError::invalid_path(path, "not a directory"));
    }

    let mut packages = Vec::new();
    collect_into(path, depth, &mut packages);
    Ok(packages)
}

fn collect_into(path: &Path, depth: usize, packages: &mut Vec<Package>) {
    match load_package(path) {
        Ok(package) => {
            packages.push(package);
            return;
        }
        Err(e) => debug!("skipping {}: {}", path.display(), e),
    }

    if depth == 0 {
        return;
    }

    for dir in subdirectories(path) {
        collect_into(&dir, depth - 1, packages);
    }
}

/// Non-hidden subdirectories of `path`, sorted by name
fn subdirectories(path: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn validate_is_dir(path: &Path) -> Result<(), PackageError> {
    if !path.exists() {
        return Err(PackageError::invalid_path(
            path,
            "doesn't exist or not accessible",
        ));
    }
    if !path.is_dir() {
        return Err(PackageError::invalid_path(path, "is not a directory"));
    }
    Ok(())
}

fn validate_is_package(path: &Path) -> Result<(), PackageError> {
    if !pkgbuild_path(path).exists() {
        return Err(PackageError::not_a_package(path, PKGBUILD));
    }
    if !srcinfo_path(path).exists() {
        return Err(PackageError::not_a_package(path, SRCINFO));
    }
    Ok(())
}
