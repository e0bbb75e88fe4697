//! PKGBUILD version rewriting
//!
//! The PKGBUILD is treated as plain text: every occurrence of the current
//! version is replaced, which also covers versions embedded in source URLs
//! and checksum file names.

use crate::domain::Version;
use regex::Regex;
use std::sync::LazyLock;

/// Release number a freshly bumped package starts at
const INITIAL_PKGREL: &str = "1";

static PKGREL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pkgrel=\d+").expect("valid regex"));

/// Replace `current` with `upstream` everywhere in the PKGBUILD content and
/// reset the release number to 1 unless it already is.
pub fn bump_pkgbuild(content: &str, current: &Version, upstream: &Version, pkgrel: &str) -> String {
    let bumped = content.replace(current.as_str(), upstream.as_str());
    if pkgrel == INITIAL_PKGREL {
        return bumped;
    }
    PKGREL_RE
        .replace_all(&bumped, format!("pkgrel={}", INITIAL_PKGREL).as_str())
        .into_owned()
}
