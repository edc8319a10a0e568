//! Report views over a populated dependency graph
//!
//! Each view groups derived `(project, package, version)` rows by project,
//! ordered for presentation.

use crate::domain::{NuGetVersion, ProjectPackage};
use crate::graph::DependencyGraph;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Which derivation a report is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Projects that observed more than one version of a package
    Redirects,
    /// Projects behind the tree-wide maximum of a package
    Upgrades,
    /// Every package of every project
    Dependencies,
}

impl ReportKind {
    /// Sentence printed above a non-empty report
    pub fn heading(&self) -> &'static str {
        match self {
            ReportKind::Redirects => "The following projects need binding redirects:",
            ReportKind::Upgrades => "The following projects need to upgrade nuget packages:",
            ReportKind::Dependencies => "The following project dependencies were identified:",
        }
    }

    /// Sentence printed instead of an empty report
    pub fn empty_message(&self) -> &'static str {
        match self {
            ReportKind::Redirects => "No needed binding redirects found.",
            ReportKind::Upgrades => "No needed upgrades found.",
            ReportKind::Dependencies => "No dependencies found.",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Redirects => "redirects",
            ReportKind::Upgrades => "upgrades",
            ReportKind::Dependencies => "dependencies",
        }
    }
}

/// One package line of a project group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub package: String,
    pub version: NuGetVersion,
}

/// All entries reported for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReport {
    /// Project file path as recorded
    pub project: String,
    /// File stem of the project path
    pub name: String,
    pub entries: Vec<ReportEntry>,
}

impl ProjectReport {
    fn new(project: String) -> Self {
        let name = display_name(&project);
        Self {
            project,
            name,
            entries: Vec::new(),
        }
    }
}

/// A grouped, ordered view of one derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub projects: Vec<ProjectReport>,
}

impl Report {
    /// Builds the `kind` view of `graph`
    pub fn build(kind: ReportKind, graph: &DependencyGraph) -> Self {
        let rows: Vec<ProjectPackage> = match kind {
            ReportKind::Redirects => graph.binding_redirects().collect(),
            ReportKind::Upgrades => graph.package_upgrades().collect(),
            ReportKind::Dependencies => graph.resolved_dependencies().collect(),
        };
        Self::from_rows(kind, rows)
    }

    /// Groups rows by project, both levels sorted case-insensitively
    pub fn from_rows(kind: ReportKind, rows: impl IntoIterator<Item = ProjectPackage>) -> Self {
        let mut groups: BTreeMap<String, ProjectReport> = BTreeMap::new();
        for row in rows {
            groups
                .entry(row.project.to_lowercase())
                .or_insert_with(|| ProjectReport::new(row.project.clone()))
                .entries
                .push(ReportEntry {
                    package: row.package,
                    version: row.version,
                });
        }

        let mut projects: Vec<ProjectReport> = groups.into_values().collect();
        for group in &mut projects {
            group.entries.sort_by_cached_key(|e| e.package.to_lowercase());
        }

        Self { kind, projects }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Total number of package lines across all projects
    pub fn entry_count(&self) -> usize {
        self.projects.iter().map(|p| p.entries.len()).sum()
    }
}

/// File stem of a project path, falling back to the full path
fn display_name(project: &str) -> String {
    // Paths may come from another platform's separator convention
    let last = project.rsplit(['/', '\\']).next().unwrap_or(project);
    Path::new(last)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| project.to_string())
}
