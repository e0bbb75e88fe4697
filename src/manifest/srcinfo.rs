//! .SRCINFO parsing
//!
//! Only the handful of fields bumper needs are extracted:
//! - pkgbase, pkgver, pkgrel, url (exactly one value each)
//! - pkgname (one or more values, split packages)
//! - source and source_<arch> (any number of values)

use crate::error::PackageError;
use std::collections::HashMap;
use std::path::Path;

/// Separator between field name and value
const SRCINFO_SEPARATOR: &str = " = ";

/// Fields that must appear exactly once
const SINGLE_VALUE_FIELDS: &[&str] = &["pkgbase", "pkgver", "pkgrel", "url"];

/// Fields extracted from a .SRCINFO file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Srcinfo {
    pub pkgbase: String,
    pub pkgnames: Vec<String>,
    pub url: String,
    pub pkgver: String,
    pub pkgrel: String,
    pub sources: Vec<String>,
}

/// Read and parse the .SRCINFO at the given path
pub fn read_srcinfo(path: &Path) -> Result<Srcinfo, PackageError> {
    let content = std::fs::read_to_string(path).map_err(|e| PackageError::io(path, e))?;
    parse_srcinfo(&content, path)
}

/// Parse .SRCINFO content. `path` is only used for error messages.
pub fn parse_srcinfo(content: &str, path: &Path) -> Result<Srcinfo, PackageError> {
    let mut raw: HashMap<&str, Vec<&str>> = HashMap::new();

    for line in content.lines() {
        if let Some((name, value)) = line.trim().split_once(SRCINFO_SEPARATOR) {
            raw.entry(name.trim()).or_default().push(value.trim());
        }
    }

    let single = |field: &str| -> Result<String, PackageError> {
        match raw.get(field).map(Vec::as_slice) {
            Some([value]) => Ok(value.to_string()),
            _ => Err(PackageError::invalid_srcinfo(path, field)),
        }
    };

    for field in SINGLE_VALUE_FIELDS {
        single(field)?;
    }

    let pkgnames: Vec<String> = raw
        .get("pkgname")
        .map(|names| names.iter().map(|n| n.to_string()).collect())
        .unwrap_or_default();
    if pkgnames.is_empty() {
        return Err(PackageError::invalid_srcinfo(path, "pkgname"));
    }

    // `source` and `source_<arch>` entries, in file order.
    let mut sources: Vec<String> = Vec::new();
    for line in content.lines() {
        if let Some((name, value)) = line.trim().split_once(SRCINFO_SEPARATOR) {
            let name = name.trim();
            if name == "source" || name.starts_with("source_") {
                sources.push(value.trim().to_string());
            }
        }
    }

    Ok(Srcinfo {
        pkgbase: single("pkgbase")?,
        pkgnames,
        url: single("url")?,
        pkgver: single("pkgver")?,
        pkgrel: single("pkgrel")?,
        sources,
    })
}
