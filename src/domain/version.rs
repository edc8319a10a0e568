//! NuGet package versions
//!
//! Accepts one to four numeric components, an optional `-prerelease` label and
//! optional `+metadata`, e.g. `1.0`, `4.7.2.1`, `2.1.3-beta.1+sha.5114f85`.
//! Build metadata is accepted but does not participate in comparison or display.

use crate::error::VersionError;
use regex::Regex;
use semver::Prerelease;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+))?(?:\+([0-9A-Za-z.-]+))?$",
    )
    .unwrap()
});

/// A comparable NuGet package version
#[derive(Debug, Clone)]
pub struct NuGetVersion {
    /// major, minor, patch, revision; unwritten components are zero
    components: [u64; 4],
    /// Number of components as written, used for display
    written: usize,
    /// Prerelease label as written, empty for release versions
    prerelease: Prerelease,
    /// Lowercased label; prerelease precedence ignores case
    precedence: Prerelease,
}

impl NuGetVersion {
    /// Create a release version from its four numeric components
    pub fn new(major: u64, minor: u64, patch: u64, revision: u64) -> Self {
        let written = if revision > 0 { 4 } else { 3 };
        Self {
            components: [major, minor, patch, revision],
            written,
            prerelease: Prerelease::EMPTY,
            precedence: Prerelease::EMPTY,
        }
    }

    /// Parse a version, returning `None` when the text is not a valid version
    pub fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    pub fn major(&self) -> u64 {
        self.components[0]
    }

    pub fn minor(&self) -> u64 {
        self.components[1]
    }

    pub fn patch(&self) -> u64 {
        self.components[2]
    }

    pub fn revision(&self) -> u64 {
        self.components[3]
    }

    /// Returns the prerelease label (empty for release versions)
    pub fn prerelease(&self) -> &str {
        self.prerelease.as_str()
    }

    /// Returns true if this version carries a prerelease label
    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }
}

impl FromStr for NuGetVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let caps = VERSION_PATTERN
            .captures(text)
            .ok_or_else(|| VersionError::invalid(s))?;

        let mut components = [0u64; 4];
        let mut written = 0;
        for (index, slot) in components.iter_mut().enumerate() {
            if let Some(part) = caps.get(index + 1) {
                *slot = part
                    .as_str()
                    .parse()
                    .map_err(|_| VersionError::invalid(s))?;
                written = index + 1;
            }
        }

        let (prerelease, precedence) = match caps.get(5) {
            Some(label) => {
                let invalid = |_| VersionError::invalid(s);
                (
                    Prerelease::new(label.as_str()).map_err(invalid)?,
                    Prerelease::new(&label.as_str().to_ascii_lowercase()).map_err(invalid)?,
                )
            }
            None => (Prerelease::EMPTY, Prerelease::EMPTY),
        };

        Ok(Self {
            components,
            written,
            prerelease,
            precedence,
        })
    }
}

impl PartialEq for NuGetVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NuGetVersion {}

impl Ord for NuGetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components
            .cmp(&other.components)
            .then_with(|| {
                match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => self.precedence.cmp(&other.precedence),
                }
            })
    }
}

impl PartialOrd for NuGetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NuGetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.written.max(2);
        for (index, component) in self.components[..shown].iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", component)?;
        }
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }
        Ok(())
    }
}

impl Serialize for NuGetVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
