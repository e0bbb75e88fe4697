//! Package version type and pacman-style version ordering

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Characters allowed in an upstream version string
static UPSTREAM_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("valid regex"));

/// A version string.
///
/// Two versions are equal only when their strings are byte-equal. Ordering
/// between versions is defined by [`vercmp`] and is exposed through
/// [`Version::cmp_version`] rather than `Ord`, because `1.0` and `1.00`
/// order as equal while being different values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Wrap a locally recorded version verbatim
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse a version string reported by an upstream source.
    ///
    /// Accepts only strings made of letters, digits, `_` and `.` that contain
    /// at least one digit. A single leading `v` is stripped.
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }
        if !UPSTREAM_VERSION_RE.is_match(raw) {
            return None;
        }
        let trimmed = raw.strip_prefix('v').unwrap_or(raw);
        Some(Self(trimmed.to_string()))
    }

    /// Get the version as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare with another version using [`vercmp`]
    pub fn cmp_version(&self, other: &Version) -> Ordering {
        vercmp(&self.0, &other.0)
    }

    /// Whether this version is strictly newer than `other`
    pub fn is_newer_than(&self, other: &Version) -> bool {
        self.cmp_version(other) == Ordering::Greater
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Compare two version strings the way pacman's `rpmvercmp` does.
///
/// Returns `Greater` when `a` is newer than `b`, `Less` when `b` is newer and
/// `Equal` when both describe the same version.
///
/// The strings are walked segment by segment. A segment is a maximal run of
/// ASCII digits or ASCII letters; everything else separates segments.
/// - When the separator runs before a segment differ in length, the side
///   with the shorter run is newer.
/// - A numeric segment is always newer than an alphabetic one.
/// - Numeric segments compare by value (leading zeros ignored, longer wins),
///   alphabetic ones lexically.
/// - When one side runs out, a remaining alphabetic segment is older than
///   nothing (`1.0beta < 1.0`) and anything else is newer (`1.0.1 > 1.0`).
///
/// ```
/// use bumper::domain::vercmp;
/// use std::cmp::Ordering;
///
/// assert_eq!(vercmp("1.0rc", "1.0"), Ordering::Less);
/// assert_eq!(vercmp("1.0", "01.00"), Ordering::Equal);
/// assert_eq!(vercmp("1.10", "1.9"), Ordering::Greater);
/// assert_eq!(vercmp("1.0", "1..0"), Ordering::Greater);
/// ```
pub fn vercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (a, b) = (a.as_bytes(), b.as_bytes());
    // Start of the segment being examined, and end of the previous one.
    let (mut a_start, mut b_start) = (0usize, 0usize);
    let (mut a_end, mut b_end) = (0usize, 0usize);

    while a_start < a.len() && b_start < b.len() {
        a_start = skip_separators(a, a_start);
        b_start = skip_separators(b, b_start);

        if a_start >= a.len() || b_start >= b.len() {
            break;
        }

        let separators = (b_start - b_end).cmp(&(a_start - a_end));
        if separators != Ordering::Equal {
            return separators;
        }

        let numeric = a[a_start].is_ascii_digit();
        let class: fn(&u8) -> bool = if numeric {
            u8::is_ascii_digit
        } else {
            u8::is_ascii_alphabetic
        };
        a_end = segment_end(a, a_start, class);
        b_end = segment_end(b, b_start, class);

        // `b` has a segment of the other class here.
        if b_end == b_start {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let a_seg = &a[a_start..a_end];
        let b_seg = &b[b_start..b_end];
        let segments = if numeric {
            compare_numeric(a_seg, b_seg)
        } else {
            a_seg.cmp(b_seg)
        };
        if segments != Ordering::Equal {
            return segments;
        }

        a_start = a_end;
        b_start = b_end;
    }

    let a_done = a_start >= a.len();
    let b_done = b_start >= b.len();
    if a_done && b_done {
        return Ordering::Equal;
    }

    if (a_done && !b[b_start].is_ascii_alphabetic())
        || (!a_done && a[a_start].is_ascii_alphabetic())
    {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

fn skip_separators(s: &[u8], mut pos: usize) -> usize {
    while pos < s.len() && !s[pos].is_ascii_alphanumeric() {
        pos += 1;
    }
    pos
}

fn segment_end(s: &[u8], mut pos: usize, class: fn(&u8) -> bool) -> usize {
    while pos < s.len() && class(&s[pos]) {
        pos += 1;
    }
    pos
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let a = trim_leading_zeros(a);
    let b = trim_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn trim_leading_zeros(s: &[u8]) -> &[u8] {
    let first = s.iter().position(|&c| c != b'0').unwrap_or(s.len());
    &s[first..]
}
