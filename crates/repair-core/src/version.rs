//! Dataset versions and version requests.
//!
//! Versions are semver values restricted to `major[.minor[.patch]]` with an
//! optional prerelease tag and no build metadata. Two spellings of the
//! prerelease are accepted:
//!
//! - semver style: `3-beta`, `v3.0.0-beta.2`
//! - legacy single-letter suffix: `v2.5b` (read as prerelease `b`)
//!
//! A zero minor or patch component acts as a wildcard in [`Version::matches`],
//! so the request `2` matches `2.0.1` and `2.5-b`.
//!
//! # Examples
//!
//! ```
//! use repair_core::version::Version;
//!
//! let request = Version::parse("v2").unwrap();
//! assert!(request.matches(&Version::parse("2.0.2").unwrap()));
//! assert_eq!(Version::parse("v2.5b").unwrap().to_string(), "2.5-b");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[vV]?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z][0-9A-Za-z.-]*)|([A-Za-z]))?(?:\+([0-9A-Za-z.-]+))?$",
    )
    .expect("VERSION_PATTERN is a constant, well-formed regex")
});

/// A parsed, totally ordered dataset version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(semver::Version);

impl Version {
    /// Build a release version from its numeric components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parse a version string.
    ///
    /// Missing minor/patch components become zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] if the string does not follow the
    /// grammar or carries build metadata.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = |reason: &str| Error::InvalidVersion {
            version: input.to_string(),
            reason: reason.to_string(),
        };

        let caps = VERSION_PATTERN.captures(trimmed).ok_or_else(|| {
            invalid("expected v<major>[.<minor>[.<patch>]] with an optional prerelease tag")
        })?;

        if caps.get(6).is_some() {
            return Err(invalid("build metadata is not supported"));
        }

        let component = |idx: usize| -> Result<u64> {
            match caps.get(idx) {
                Some(m) => m
                    .as_str()
                    .parse::<u64>()
                    .map_err(|_| invalid("numeric component out of range")),
                None => Ok(0),
            }
        };

        let mut version = semver::Version::new(component(1)?, component(2)?, component(3)?);

        if let Some(tag) = caps.get(4).or_else(|| caps.get(5)) {
            version.pre = semver::Prerelease::new(tag.as_str())
                .map_err(|e| invalid(&format!("invalid prerelease tag: {e}")))?;
        }

        Ok(Self(version))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Prerelease tag, if any.
    pub fn prerelease(&self) -> Option<&str> {
        if self.0.pre.is_empty() {
            None
        } else {
            Some(self.0.pre.as_str())
        }
    }

    /// Whether `candidate` satisfies this version used as a request.
    ///
    /// Majors must be equal. A zero minor or patch here matches any value in
    /// the candidate; a non-zero one must be equal. An absent prerelease
    /// matches any prerelease.
    pub fn matches(&self, candidate: &Version) -> bool {
        let (req, cand) = (&self.0, &candidate.0);
        req.major == cand.major
            && (req.minor == 0 || req.minor == cand.minor)
            && (req.patch == 0 || req.patch == cand.patch)
            && (req.pre.is_empty() || req.pre == cand.pre)
    }

    /// Display form with every component, e.g. `2.0.0` or `3.0.0-beta`.
    pub fn full(&self) -> String {
        self.0.to_string()
    }
}

/// Compact form: trailing zero components are elided, the major is kept.
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.0;
        write!(f, "{}", v.major)?;
        if v.minor != 0 || v.patch != 0 {
            write!(f, ".{}", v.minor)?;
        }
        if v.patch != 0 {
            write!(f, ".{}", v.patch)?;
        }
        if !v.pre.is_empty() {
            write!(f, "-{}", v.pre)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// What the caller asked for, before resolution against a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionRequest {
    /// Use the variant's default version (managed acquisition only)
    #[default]
    Default,
    /// A user-supplied string, parsed at resolution time
    Raw(String),
    /// An already parsed version
    Exact(Version),
}

impl VersionRequest {
    /// Parse the request. `None` means "use the default".
    pub fn to_version(&self) -> Result<Option<Version>> {
        match self {
            Self::Default => Ok(None),
            Self::Raw(raw) if raw.trim().is_empty() => Ok(None),
            Self::Raw(raw) => Version::parse(raw).map(Some),
            Self::Exact(version) => Ok(Some(version.clone())),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default) || matches!(self, Self::Raw(raw) if raw.trim().is_empty())
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Raw(raw) => f.write_str(raw),
            Self::Exact(version) => write!(f, "{version}"),
        }
    }
}

impl From<&str> for VersionRequest {
    fn from(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Self::Default
        } else {
            Self::Raw(raw.to_string())
        }
    }
}

impl From<String> for VersionRequest {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<Option<String>> for VersionRequest {
    fn from(raw: Option<String>) -> Self {
        raw.map(Self::from).unwrap_or_default()
    }
}

impl From<Version> for VersionRequest {
    fn from(version: Version) -> Self {
        Self::Exact(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[rstest]
    #[case("v2", 2, 0, 0, None)]
    #[case("2", 2, 0, 0, None)]
    #[case("v2.0.1", 2, 0, 1, None)]
    #[case("2.5b", 2, 5, 0, Some("b"))]
    #[case("v3-beta", 3, 0, 0, Some("beta"))]
    #[case("3.0.0-beta.2", 3, 0, 0, Some("beta.2"))]
    #[case("  v1.2.3  ", 1, 2, 3, None)]
    fn test_parse_valid(
        #[case] raw: &str,
        #[case] major: u64,
        #[case] minor: u64,
        #[case] patch: u64,
        #[case] pre: Option<&str>,
    ) {
        let parsed = v(raw);
        assert_eq!(parsed.major(), major);
        assert_eq!(parsed.minor(), minor);
        assert_eq!(parsed.patch(), patch);
        assert_eq!(parsed.prerelease(), pre);
    }

    #[rstest]
    #[case("")]
    #[case("v")]
    #[case("b")]
    #[case("x2.0")]
    #[case("2.0.1.4")]
    #[case("2..1")]
    #[case("2.0.1+build5")]
    #[case("2.5bc")]
    #[case("2.0-01")]
    fn test_parse_invalid(#[case] raw: &str) {
        let err = Version::parse(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidVersion { .. }), "got {err:?}");
    }

    #[test]
    fn test_build_metadata_rejected_with_reason() {
        let err = Version::parse("2.0.1+abc").unwrap_err();
        assert!(err.to_string().contains("build metadata"));
    }

    #[rstest]
    #[case("v2", "2")]
    #[case("2.0.1", "2.0.1")]
    #[case("2.5.0", "2.5")]
    #[case("v2.5b", "2.5-b")]
    #[case("3.0.0-beta", "3-beta")]
    #[case("0.0.0", "0")]
    fn test_display_elides_trailing_zeros(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(v(raw).to_string(), expected);
    }

    #[test]
    fn test_full_keeps_all_components() {
        assert_eq!(v("2").full(), "2.0.0");
        assert_eq!(v("3-beta").full(), "3.0.0-beta");
    }

    #[test]
    fn test_ordering_is_major_minor_patch_prerelease() {
        let mut versions = vec![v("2.5b"), v("2.0.2"), v("2"), v("3-beta"), v("2.0.1"), v("2.5")];
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(|x| x.to_string()).collect();
        assert_eq!(rendered, vec!["2", "2.0.1", "2.0.2", "2.5-b", "2.5", "3-beta"]);
    }

    #[rstest]
    #[case("2", "2.0.2", true)]
    #[case("2", "2.5b", true)]
    #[case("2", "3", false)]
    #[case("2.0.1", "2.0.1", true)]
    #[case("2.0.1", "2.0.2", false)]
    #[case("2.5", "2.5.3", true)]
    #[case("2.5", "2.4.3", false)]
    #[case("2.5b", "2.5", false)]
    #[case("2.5b", "2.5b", true)]
    fn test_matches(#[case] request: &str, #[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(v(request).matches(&v(candidate)), expected);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&v("2.5b")).unwrap();
        assert_eq!(json, "\"2.5-b\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v("2.5b"));
    }

    #[test]
    fn test_request_conversions() {
        assert_eq!(VersionRequest::from(""), VersionRequest::Default);
        assert_eq!(VersionRequest::from(None::<String>), VersionRequest::Default);
        assert_eq!(
            VersionRequest::from("v2").to_version().unwrap(),
            Some(Version::new(2, 0, 0))
        );
        assert_eq!(VersionRequest::Raw("  ".into()).to_version().unwrap(), None);
        assert!(VersionRequest::Raw("nope".into()).to_version().is_err());
        assert!(VersionRequest::from(Version::new(2, 0, 1)).to_version().is_ok());
    }

    proptest! {
        #[test]
        fn concrete_versions_match_themselves(major in 0u64..50, minor in 0u64..50, patch in 0u64..50) {
            let version = Version::new(major, minor, patch);
            prop_assert!(version.matches(&version));
        }

        #[test]
        fn major_only_request_matches_any_same_major(major in 0u64..50, minor in 0u64..50, patch in 0u64..50) {
            let request = Version::new(major, 0, 0);
            prop_assert!(request.matches(&Version::new(major, minor, patch)));
            prop_assert!(!request.matches(&Version::new(major + 1, minor, patch)));
        }

        #[test]
        fn display_round_trips(major in 0u64..50, minor in 0u64..50, patch in 0u64..50, pre in proptest::option::of("[a-z]{1,5}")) {
            let raw = match &pre {
                Some(tag) => format!("{major}.{minor}.{patch}-{tag}"),
                None => format!("{major}.{minor}.{patch}"),
            };
            let version = Version::parse(&raw).unwrap();
            prop_assert_eq!(Version::parse(&version.to_string()).unwrap(), version);
        }
    }
}
