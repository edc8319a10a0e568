//! Package name to version envelope mapping for one scope

use super::fold_key;
use crate::domain::{NuGetVersion, VersionInterval};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScopeEntry {
    /// First spelling recorded
    name: String,
    interval: VersionInterval,
}

/// Version envelopes keyed by case-insensitive package name
///
/// Used both for a single project and for the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyScope {
    entries: BTreeMap<String, ScopeEntry>,
}

impl DependencyScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an observed version, returning true if the scope changed
    pub fn record(&mut self, package: &str, version: &NuGetVersion) -> bool {
        match self.entries.entry(fold_key(package)) {
            Entry::Vacant(slot) => {
                slot.insert(ScopeEntry {
                    name: package.to_string(),
                    interval: VersionInterval::new(version.clone()),
                });
                true
            }
            Entry::Occupied(mut slot) => slot.get_mut().interval.include(version),
        }
    }

    pub fn get(&self, package: &str) -> Option<&VersionInterval> {
        self.entries.get(&fold_key(package)).map(|e| &e.interval)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.entries.contains_key(&fold_key(package))
    }

    /// Iterates `(package, interval)` pairs ordered by folded name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VersionInterval)> {
        self.entries
            .values()
            .map(|e| (e.name.as_str(), &e.interval))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
