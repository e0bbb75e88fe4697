//! Package directory detection and package file handling
//!
//! This module provides functionality to:
//! - Detect package directories and collect them recursively
//! - Parse .SRCINFO metadata
//! - Rewrite the version in a PKGBUILD

mod detector;
mod pkgbuild;
mod srcinfo;

pub use detector::{collect_packages, load_package};
pub use pkgbuild::bump_pkgbuild;
pub use srcinfo::{parse_srcinfo, read_srcinfo, Srcinfo};
