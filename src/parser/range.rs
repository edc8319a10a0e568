//! Interval notation to representative version
//!
//! Recognized forms: `[min,max]`, `[min,max)`, `[exact]` and a bare `version`.
//! Every declared range is treated as "at least its minimum": the inclusive
//! lower bound is returned. A range with an exclusive lower bound (leading `(`)
//! has no representative version and is rejected, whatever its upper bound.

use crate::domain::NuGetVersion;

/// Resolve a dependency range to its inclusive minimum
///
/// Returns `None` for ranges that open with `(` and for ranges whose lower
/// bound is missing or is not a valid version.
pub fn parse_range(range: &str) -> Option<NuGetVersion> {
    let text = range.trim();
    if text.starts_with('(') {
        return None;
    }
    let inner = text.trim_matches(|c| matches!(c, '(' | ')' | '[' | ']'));
    let lower = inner.split(',').next().unwrap_or_default();
    NuGetVersion::parse(lower)
}
