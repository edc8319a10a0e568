//! .NET target frameworks and nearest-group selection
//!
//! Understands the short folder names (`net472`, `netstandard2.0`,
//! `netcoreapp3.1`, `net6.0`, `net8.0-windows`) and the long identifiers
//! used by assets files and nuspecs (`.NETFramework,Version=v4.7.2`,
//! `.NETStandard2.0`). Platform suffixes and profiles are ignored.

use crate::error::ConfigError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Framework family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameworkFamily {
    /// .NET Framework (net45, net472, net48)
    NetFramework,
    /// .NET Standard (netstandard1.x, netstandard2.x)
    NetStandard,
    /// .NET Core and .NET 5+ (netcoreapp3.1, net6.0)
    NetCoreApp,
}

impl FrameworkFamily {
    /// Long identifier as written in assets files
    pub fn identifier(&self) -> &'static str {
        match self {
            FrameworkFamily::NetFramework => ".NETFramework",
            FrameworkFamily::NetStandard => ".NETStandard",
            FrameworkFamily::NetCoreApp => ".NETCoreApp",
        }
    }
}

/// A parsed target framework
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetFramework {
    family: FrameworkFamily,
    version: [u32; 4],
}

impl TargetFramework {
    pub fn new(family: FrameworkFamily, version: [u32; 4]) -> Self {
        Self { family, version }
    }

    /// Parse a short or long framework name
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.trim().to_ascii_lowercase();
        match lower.strip_prefix('.') {
            Some(long) => parse_long(long),
            None => parse_short(&lower),
        }
    }

    pub fn family(&self) -> FrameworkFamily {
        self.family
    }

    pub fn version(&self) -> [u32; 4] {
        self.version
    }

    /// Returns true if a project targeting `self` can consume assets built for `candidate`
    pub fn is_compatible_with(&self, candidate: &TargetFramework) -> bool {
        if candidate.family == self.family {
            return candidate.version <= self.version;
        }
        if candidate.family != FrameworkFamily::NetStandard {
            return false;
        }
        netstandard_floor(candidate.version, self.family)
            .is_some_and(|floor| floor <= self.version)
    }

    /// Picks the candidate closest to `self`: compatible candidates only,
    /// same family before .NET Standard, then the highest version
    pub fn nearest<'a, I>(&self, candidates: I) -> Option<&'a TargetFramework>
    where
        I: IntoIterator<Item = &'a TargetFramework>,
    {
        let mut best: Option<&'a TargetFramework> = None;
        for candidate in candidates {
            if !self.is_compatible_with(candidate) {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => self.rank(candidate) > self.rank(current),
            };
            if better {
                best = Some(candidate);
            }
        }
        best
    }

    fn rank(&self, candidate: &TargetFramework) -> (bool, [u32; 4]) {
        (candidate.family == self.family, candidate.version)
    }

    /// Short folder name, e.g. `net472` or `netstandard2.0`
    pub fn short_name(&self) -> String {
        let [major, minor, ..] = self.version;
        match self.family {
            FrameworkFamily::NetFramework => {
                let shown = self
                    .version
                    .iter()
                    .rposition(|c| *c != 0)
                    .map_or(2, |last| (last + 1).max(2));
                let digits: String = self.version[..shown]
                    .iter()
                    .map(|c| c.to_string())
                    .collect();
                format!("net{}", digits)
            }
            FrameworkFamily::NetStandard => format!("netstandard{}.{}", major, minor),
            FrameworkFamily::NetCoreApp if major >= 5 => format!("net{}.{}", major, minor),
            FrameworkFamily::NetCoreApp => format!("netcoreapp{}.{}", major, minor),
        }
    }
}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

impl FromStr for TargetFramework {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigError::InvalidFramework {
            value: s.to_string(),
        })
    }
}

impl Serialize for TargetFramework {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Lowest version of `family` that implements the given .NET Standard version
fn netstandard_floor(standard: [u32; 4], family: FrameworkFamily) -> Option<[u32; 4]> {
    let [major, minor, ..] = standard;
    match family {
        FrameworkFamily::NetFramework => match (major, minor) {
            (1, 0) | (1, 1) => Some([4, 5, 0, 0]),
            (1, 2) => Some([4, 5, 1, 0]),
            (1, 3) => Some([4, 6, 0, 0]),
            (1, 4..=6) | (2, 0) => Some([4, 6, 1, 0]),
            _ => None,
        },
        FrameworkFamily::NetCoreApp => match (major, minor) {
            (1, 0..=6) => Some([1, 0, 0, 0]),
            (2, 0) => Some([2, 0, 0, 0]),
            (2, 1) => Some([3, 0, 0, 0]),
            _ => None,
        },
        FrameworkFamily::NetStandard => None,
    }
}

/// `netframework,version=v4.7.2`, `netframework4.5`, `netstandard2.0`
fn parse_long(text: &str) -> Option<TargetFramework> {
    let (family, rest) = if let Some(rest) = text.strip_prefix("netframework") {
        (FrameworkFamily::NetFramework, rest)
    } else if let Some(rest) = text.strip_prefix("netstandard") {
        (FrameworkFamily::NetStandard, rest)
    } else if let Some(rest) = text.strip_prefix("netcoreapp") {
        (FrameworkFamily::NetCoreApp, rest)
    } else {
        return None;
    };

    let rest = rest.strip_prefix(",version=").unwrap_or(rest);
    let rest = rest.strip_prefix('v').unwrap_or(rest);
    let version = rest.split(',').next().unwrap_or_default();
    parse_dotted(version).map(|version| TargetFramework::new(family, version))
}

/// `net472`, `net6.0-windows`, `netstandard2.0`, `netcoreapp3.1`
fn parse_short(text: &str) -> Option<TargetFramework> {
    let text = text.split('-').next().unwrap_or_default();

    if let Some(rest) = text.strip_prefix("netstandard") {
        return parse_dotted(rest).map(|v| TargetFramework::new(FrameworkFamily::NetStandard, v));
    }
    if let Some(rest) = text.strip_prefix("netcoreapp") {
        return parse_dotted(rest).map(|v| TargetFramework::new(FrameworkFamily::NetCoreApp, v));
    }
    let rest = text.strip_prefix("net")?;

    if rest.contains('.') {
        let version = parse_dotted(rest)?;
        let family = if version[0] >= 5 {
            FrameworkFamily::NetCoreApp
        } else {
            FrameworkFamily::NetFramework
        };
        return Some(TargetFramework::new(family, version));
    }

    // Undotted short names spell one digit per component
    if rest.is_empty() || rest.len() > 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut version = [0u32; 4];
    for (slot, digit) in version.iter_mut().zip(rest.bytes()) {
        *slot = u32::from(digit - b'0');
    }
    let family = if rest.len() == 1 && version[0] >= 5 {
        FrameworkFamily::NetCoreApp
    } else {
        FrameworkFamily::NetFramework
    };
    Some(TargetFramework::new(family, version))
}

fn parse_dotted(text: &str) -> Option<[u32; 4]> {
    if text.is_empty() {
        return None;
    }
    let mut version = [0u32; 4];
    let mut parts = text.split('.');
    for slot in version.iter_mut() {
        match parts.next() {
            Some(part) => *slot = part.parse().ok()?,
            None => break,
        }
    }
    if parts.next().is_some() {
        return None;
    }
    Some(version)
}
