//! Issues recorded for projects that were skipped or partially skipped

use serde::Serialize;
use std::fmt;

/// Why a project, or one of its declarations, was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Non-SDK project without a packages.config file
    MissingPackagesConfig,
    /// SDK project without obj/project.assets.json
    MissingAssetsJson,
    /// A declared version (or range) could not be parsed
    InvalidVersion,
    /// No local .nupkg archive to inspect for nested dependencies
    MissingPackageArchive,
    /// The .nupkg archive has no embedded .nuspec file
    MissingNuspec,
}

impl IssueKind {
    /// Returns all issue kinds
    pub fn all() -> &'static [IssueKind] {
        &[
            IssueKind::MissingPackagesConfig,
            IssueKind::MissingAssetsJson,
            IssueKind::InvalidVersion,
            IssueKind::MissingPackageArchive,
            IssueKind::MissingNuspec,
        ]
    }

    /// Short machine-friendly label
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::MissingPackagesConfig => "missing_packages_config",
            IssueKind::MissingAssetsJson => "missing_assets_json",
            IssueKind::InvalidVersion => "invalid_version",
            IssueKind::MissingPackageArchive => "missing_package_archive",
            IssueKind::MissingNuspec => "missing_nuspec",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One issue recorded against a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    /// Project file path
    pub project: String,
    /// Issue kind
    pub kind: IssueKind,
    /// Extra detail, usually `package:versionText`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IssueRecord {
    pub fn new(project: impl Into<String>, kind: IssueKind, detail: Option<String>) -> Self {
        Self {
            project: project.into(),
            kind,
            detail,
        }
    }
}

impl fmt::Display for IssueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) if !detail.trim().is_empty() => write!(f, "{} ({})", self.project, detail),
            _ => write!(f, "{}", self.project),
        }
    }
}

/// Append-only, insertion-ordered issue log
///
/// Duplicates are kept: one record per skipped declaration.
#[derive(Debug, Clone, Default)]
pub struct IssueLog {
    records: Vec<IssueRecord>,
}

impl IssueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: IssueRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[IssueRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &IssueRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records of the given kind
    pub fn count(&self, kind: IssueKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    /// Groups records by kind, kinds in order of first appearance,
    /// records within a kind sorted by project (stable)
    pub fn grouped(&self) -> Vec<(IssueKind, Vec<&IssueRecord>)> {
        let mut groups: Vec<(IssueKind, Vec<&IssueRecord>)> = Vec::new();
        for record in &self.records {
            match groups.iter_mut().find(|(kind, _)| *kind == record.kind) {
                Some((_, members)) => members.push(record),
                None => groups.push((record.kind, vec![record])),
            }
        }
        for (_, members) in &mut groups {
            members.sort_by_key(|r| r.project.to_lowercase());
        }
        groups
    }
}
