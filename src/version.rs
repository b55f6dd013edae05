//! Version comparison for release tags.
//!
//! Tags are normalized and handed to `semver` for ordering, so `1.0.10` is
//! newer than `1.0.9` and `rc.10` is newer than `rc.2`. Tags may carry a
//! leading `v`, omit trailing fields (`1.2` is `1.2.0`), and carry a
//! `-prerelease` or `+build` suffix.

use std::cmp::Ordering;
use std::fmt;

use log::warn;
use semver::{BuildMetadata, Version};

/// A version string that does not follow `major[.minor[.patch]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedVersionError {
    pub input: String,
}

impl fmt::Display for MalformedVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed version string: '{}'", self.input)
    }
}

impl std::error::Error for MalformedVersionError {}

/// Parses a release tag leniently into a semver [`Version`].
///
/// Surrounding whitespace and a leading `v`/`V` are dropped and a short core
/// is padded (`1.2` becomes `1.2.0`). Build metadata is discarded so it never
/// takes part in ordering.
pub fn parse(input: &str) -> Result<Version, MalformedVersionError> {
    let malformed = || MalformedVersionError {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    let (core, suffix) = split_core_and_suffix(trimmed);
    let fields: Vec<&str> = core.split('.').collect();
    if fields.len() > 3 {
        return Err(malformed());
    }

    let mut numbers = [0u64; 3];
    for (slot, field) in numbers.iter_mut().zip(&fields) {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        *slot = field.parse().map_err(|_| malformed())?;
    }

    let normalized = format!("{}.{}.{}{}", numbers[0], numbers[1], numbers[2], suffix);
    let mut version = Version::parse(&normalized).map_err(|_| malformed())?;
    version.build = BuildMetadata::EMPTY;
    Ok(version)
}

fn split_core_and_suffix(version: &str) -> (&str, &str) {
    let suffix_idx = version.find(['-', '+']).unwrap_or(version.len());
    (&version[..suffix_idx], &version[suffix_idx..])
}

/// Strict comparison of two version strings.
pub fn compare(remote: &str, local: &str) -> Result<Ordering, MalformedVersionError> {
    let remote = parse(remote)?;
    let local = parse(local)?;
    Ok(remote.cmp(&local))
}

/// Returns true when `remote` is strictly newer than `local`.
///
/// A malformed version on either side counts as "not newer": bad upstream
/// data must never surface as an update.
pub fn is_newer(remote: &str, local: &str) -> bool {
    match compare(remote, local) {
        Ok(ordering) => ordering == Ordering::Greater,
        Err(e) => {
            warn!("Treating as not newer: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_newer_patch_bump() {
        assert!(is_newer("1.0.7", "1.0.6"));
        assert!(!is_newer("1.0.6", "1.0.7"));
    }

    #[test]
    fn test_is_newer_equal_versions() {
        assert!(!is_newer("1.0.6", "1.0.6"));
        assert!(!is_newer("v1.0.6", "1.0.6"));
    }

    #[test]
    fn test_is_newer_numeric_not_lexical() {
        assert!(is_newer("1.0.10", "1.0.9"));
        assert!(is_newer("1.10.0", "1.9.9"));
        assert!(is_newer("10.0.0", "9.99.99"));
        assert!(!is_newer("1.0.9", "1.0.10"));
    }

    #[test]
    fn test_is_newer_major_dominates() {
        assert!(is_newer("2.0.0", "1.99.99"));
        assert!(!is_newer("1.99.99", "2.0.0"));
    }

    #[test]
    fn test_is_newer_malformed_is_not_newer() {
        assert!(!is_newer("latest", "1.0.0"));
        assert!(!is_newer("1.0.0", "garbage"));
        assert!(!is_newer("", "1.0.0"));
        assert!(!is_newer("1..0", "0.0.1"));
        assert!(!is_newer("1.0.0.0", "0.0.1"));
    }

    #[test]
    fn test_parse_missing_fields_default_to_zero() {
        let v = parse("1.2").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 0));
        assert_eq!(compare("1.2", "1.2.0").unwrap(), Ordering::Equal);
        assert!(is_newer("2", "1.9.9"));
    }

    #[test]
    fn test_parse_strips_prefix_and_build() {
        let v = parse("v1.2.3+build.7").unwrap();
        assert_eq!(v.to_string(), "1.2.3");
        assert_eq!(compare("1.2.3+a", "1.2.3+b").unwrap(), Ordering::Equal);
        let v = parse(" V3.0.1 ").unwrap();
        assert_eq!(v.to_string(), "3.0.1");
    }

    #[test]
    fn test_prerelease_orders_below_release() {
        assert!(is_newer("1.0.8", "1.0.8-beta"));
        assert!(!is_newer("1.0.8-beta", "1.0.8"));
        assert!(is_newer("1.0.8-rc.2", "1.0.8-rc.1"));
        assert!(is_newer("1.0.8-alpha", "1.0.7"));
    }

    #[test]
    fn test_prerelease_numeric_identifiers() {
        assert!(is_newer("1.0.8-rc.10", "1.0.8-rc.2"));
        assert!(!is_newer("1.0.8-rc.2", "1.0.8-rc.10"));
        assert!(is_newer("1.0.8-beta", "1.0.8-alpha.5"));
        assert!(is_newer("v1.1-rc.1", "1.0.9"));
    }

    #[test]
    fn test_parse_rejects_empty_prerelease() {
        assert!(parse("1.0.0-").is_err());
        assert!(parse("1.0.0-rc..1").is_err());
    }

    #[test]
    fn test_compare_reports_malformed_input() {
        let err = compare("1.0.x", "1.0.0").unwrap_err();
        assert_eq!(err.input, "1.0.x");
        assert!(err.to_string().contains("1.0.x"));
    }

    #[test]
    fn test_parse_tolerates_leading_zeros() {
        assert_eq!(parse("01.02.03").unwrap(), Version::new(1, 2, 3));
    }
}
