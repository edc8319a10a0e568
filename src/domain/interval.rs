//! Version envelopes observed for one package in one scope

use super::NuGetVersion;
use serde::Serialize;
use std::fmt;

/// The `[min, max]` span of every version observed for a package
///
/// Created from a single observation; [`VersionInterval::include`] only ever
/// widens it, so `min` and `max` are always the smallest and largest versions
/// seen so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInterval {
    min: NuGetVersion,
    max: NuGetVersion,
}

impl VersionInterval {
    /// Creates a singleton interval from one observed version
    pub fn new(version: NuGetVersion) -> Self {
        Self {
            min: version.clone(),
            max: version,
        }
    }

    pub fn min(&self) -> &NuGetVersion {
        &self.min
    }

    pub fn max(&self) -> &NuGetVersion {
        &self.max
    }

    /// Widens the interval to cover `version`, returning true if it changed
    pub fn include(&mut self, version: &NuGetVersion) -> bool {
        let mut widened = false;
        if *version < self.min {
            self.min = version.clone();
            widened = true;
        }
        if *version > self.max {
            self.max = version.clone();
            widened = true;
        }
        widened
    }

    /// Returns true if more than one distinct version was observed
    pub fn is_spread(&self) -> bool {
        self.min < self.max
    }

    /// Returns true if `version` lies within the envelope
    pub fn contains(&self, version: &NuGetVersion) -> bool {
        self.min <= *version && *version <= self.max
    }
}

impl fmt::Display for VersionInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}
