//! Tree-wide and per-project dependency aggregation
//!
//! Lifecycle: created empty per analysis run, filled with direct observations
//! and issues by the scanners, propagated once across project references,
//! then queried by the report views.

use super::propagation::{self, PropagationPlan};
use super::{fold_key, DependencyScope};
use crate::domain::{IssueKind, IssueLog, IssueRecord, NuGetVersion, ProjectPackage, ProjectReference};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
struct ProjectScope {
    /// First spelling recorded
    project: String,
    scope: DependencyScope,
}

/// Owns the tree-wide scope, one scope per project and the issue log
///
/// Invariant: every package in a project scope is also in the tree scope,
/// and the tree interval covers every project interval for that package.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    tree: DependencyScope,
    projects: BTreeMap<String, ProjectScope>,
    issues: IssueLog,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observed `(project, package, version)` triple
    ///
    /// Returns true if the project's scope changed. Recording the same triple
    /// again leaves both scopes unchanged.
    pub fn record_dependency(&mut self, project: &str, package: &str, version: &NuGetVersion) -> bool {
        self.tree.record(package, version);
        self.projects
            .entry(fold_key(project))
            .or_insert_with(|| ProjectScope {
                project: project.to_string(),
                scope: DependencyScope::new(),
            })
            .scope
            .record(package, version)
    }

    /// Appends an issue for `project`
    pub fn record_issue(&mut self, project: &str, kind: IssueKind, detail: Option<String>) {
        self.issues.push(IssueRecord::new(project, kind, detail));
    }

    /// Copies the referenced project's envelope into `project`'s scope
    ///
    /// For every package of `referenced`, both its observed minimum and maximum
    /// are recorded for `project`. Returns true if `project`'s scope changed.
    /// A referenced project without a scope, or a self-reference, is a no-op.
    pub fn propagate_project_reference(&mut self, project: &str, referenced: &str) -> bool {
        if fold_key(project) == fold_key(referenced) {
            return false;
        }
        let Some(source) = self.projects.get(&fold_key(referenced)) else {
            return false;
        };

        let envelope: Vec<(String, NuGetVersion, NuGetVersion)> = source
            .scope
            .iter()
            .map(|(name, interval)| (name.to_string(), interval.min().clone(), interval.max().clone()))
            .collect();

        let mut changed = false;
        for (package, min, max) in &envelope {
            changed |= self.record_dependency(project, package, min);
            changed |= self.record_dependency(project, package, max);
        }
        changed
    }

    /// Propagates a batch of references in dependency order
    ///
    /// Referenced projects are completed before the projects referencing them.
    /// When the references form a cycle, every reference is applied repeatedly
    /// in discovery order until no scope changes.
    pub fn propagate_references(&mut self, references: &[ProjectReference]) {
        match propagation::plan(references) {
            PropagationPlan::Ordered(order) => {
                debug!(references = order.len(), "propagating project references");
                for index in order {
                    let reference = &references[index];
                    self.propagate_project_reference(&reference.project, &reference.referenced);
                }
            }
            PropagationPlan::FixedPoint { cycle_at } => {
                warn!(project = %cycle_at, "project references form a cycle, propagating to a fixed point");
                let mut rounds = 0usize;
                loop {
                    rounds += 1;
                    let mut changed = false;
                    for reference in references {
                        changed |= self.propagate_project_reference(&reference.project, &reference.referenced);
                    }
                    if !changed {
                        break;
                    }
                }
                debug!(rounds, "reference propagation converged");
            }
        }
    }

    /// Packages for which a single project observed more than one version,
    /// paired with that project's highest version
    pub fn binding_redirects(&self) -> impl Iterator<Item = ProjectPackage> + '_ {
        self.projects.values().flat_map(|entry| {
            entry
                .scope
                .iter()
                .filter(|(_, interval)| interval.is_spread())
                .map(move |(package, interval)| {
                    ProjectPackage::new(&entry.project, package, interval.max().clone())
                })
        })
    }

    /// Packages for which the tree-wide maximum exceeds the project's own maximum,
    /// paired with the tree-wide maximum
    pub fn package_upgrades(&self) -> impl Iterator<Item = ProjectPackage> + '_ {
        self.projects.values().flat_map(move |entry| {
            entry.scope.iter().filter_map(move |(package, interval)| {
                let tree_max = self.tree.get(package)?.max();
                (tree_max > interval.max())
                    .then(|| ProjectPackage::new(&entry.project, package, tree_max.clone()))
            })
        })
    }

    /// Every package of every project, paired with the project's highest version
    pub fn resolved_dependencies(&self) -> impl Iterator<Item = ProjectPackage> + '_ {
        self.projects.values().flat_map(|entry| {
            entry.scope.iter().map(move |(package, interval)| {
                ProjectPackage::new(&entry.project, package, interval.max().clone())
            })
        })
    }

    /// The issue log, in insertion order
    pub fn issues(&self) -> &IssueLog {
        &self.issues
    }

    /// The tree-wide scope
    pub fn tree_scope(&self) -> &DependencyScope {
        &self.tree
    }

    /// The scope of one project, if it recorded anything
    pub fn scope(&self, project: &str) -> Option<&DependencyScope> {
        self.projects.get(&fold_key(project)).map(|e| &e.scope)
    }

    /// Projects with a scope, ordered by folded path
    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.projects.values().map(|e| e.project.as_str())
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> NuGetVersion {
        text.parse().unwrap()
    }

    fn row(project: &str, package: &str, version: &str) -> ProjectPackage {
        ProjectPackage::new(project, package, v(version))
    }

    #[test]
    fn test_record_dependency_updates_tree_and_project() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("P", "A", &v("1.0"));
        graph.record_dependency("Q", "A", &v("2.0"));

        assert_eq!(graph.tree_scope().get("A").unwrap().to_string(), "1.0-2.0");
        assert_eq!(graph.scope("P").unwrap().get("A").unwrap().to_string(), "1.0");
        assert_eq!(graph.scope("Q").unwrap().get("A").unwrap().to_string(), "2.0");
        assert_eq!(graph.project_count(), 2);
    }

    #[test]
    fn test_project_identity_is_case_insensitive() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("C:/src/App.csproj", "A", &v("1.0"));
        graph.record_dependency("c:/SRC/app.csproj", "A", &v("2.0"));
        assert_eq!(graph.project_count(), 1);
        assert_eq!(graph.projects().next(), Some("C:/src/App.csproj"));
    }

    #[test]
    fn test_binding_redirect_detected() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("P", "A", &v("1.0"));
        graph.record_dependency("P", "A", &v("2.0"));
        graph.record_dependency("P", "B", &v("1.0"));

        let redirects: Vec<_> = graph.binding_redirects().collect();
        assert_eq!(redirects, vec![row("P", "A", "2.0")]);
    }

    #[test]
    fn test_no_redirects_for_single_versions() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("P", "A", &v("1.0"));
        graph.record_dependency("Q", "A", &v("2.0"));
        assert_eq!(graph.binding_redirects().count(), 0);
    }

    #[test]
    fn test_upgrade_detected() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("P", "A", &v("2.0"));
        graph.record_dependency("Q", "A", &v("3.0"));

        let upgrades: Vec<_> = graph.package_upgrades().collect();
        assert_eq!(upgrades, vec![row("P", "A", "3.0")]);
    }

    #[test]
    fn test_no_upgrade_when_at_tree_max() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("P", "A", &v("1.0"));
        graph.record_dependency("P", "A", &v("3.0"));
        graph.record_dependency("Q", "A", &v("3.0"));
        assert_eq!(graph.package_upgrades().count(), 0);
    }

    #[test]
    fn test_upgrade_uses_case_insensitive_tree_lookup() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("P", "Newtonsoft.Json", &v("12.0.1"));
        graph.record_dependency("Q", "newtonsoft.json", &v("13.0.1"));

        let upgrades: Vec<_> = graph.package_upgrades().collect();
        assert_eq!(upgrades, vec![row("P", "Newtonsoft.Json", "13.0.1")]);
    }

    #[test]
    fn test_resolved_dependencies_use_project_max() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("P", "A", &v("1.0"));
        graph.record_dependency("P", "A", &v("1.5"));
        graph.record_dependency("Q", "A", &v("3.0"));

        let resolved: Vec<_> = graph.resolved_dependencies().collect();
        assert_eq!(resolved, vec![row("P", "A", "1.5"), row("Q", "A", "3.0")]);
    }

    #[test]
    fn test_derivations_are_restartable() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("P", "A", &v("1.0"));
        graph.record_dependency("P", "A", &v("2.0"));
        graph.record_dependency("Q", "A", &v("3.0"));

        let first: Vec<_> = graph.binding_redirects().chain(graph.package_upgrades()).collect();
        let second: Vec<_> = graph.binding_redirects().chain(graph.package_upgrades()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_propagation_copies_envelope() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("ProjB", "A", &v("1.0"));
        assert!(graph.propagate_project_reference("ProjA", "ProjB"));

        let interval = graph.scope("ProjA").unwrap().get("A").unwrap();
        assert_eq!(interval.min(), &v("1.0"));
        assert_eq!(interval.max(), &v("1.0"));
        assert!(graph
            .resolved_dependencies()
            .any(|r| r == row("ProjA", "A", "1.0")));
    }

    #[test]
    fn test_propagation_records_both_endpoints() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("Lib", "A", &v("1.0"));
        graph.record_dependency("Lib", "A", &v("2.0"));
        graph.record_dependency("App", "A", &v("1.5"));
        graph.propagate_project_reference("App", "Lib");

        assert_eq!(graph.scope("App").unwrap().get("A").unwrap().to_string(), "1.0-2.0");
    }

    #[test]
    fn test_propagation_from_unknown_project_is_noop() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("App", "A", &v("1.0"));
        assert!(!graph.propagate_project_reference("App", "Missing"));
        assert!(!graph.propagate_project_reference("App", "app"));
        assert_eq!(graph.project_count(), 1);
    }

    #[test]
    fn test_propagate_references_follows_topological_order() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("C", "Core", &v("3.0"));
        graph.record_dependency("B", "Mid", &v("2.0"));

        // Discovery order lists A -> B before B -> C
        let references = vec![ProjectReference::new("A", "B"), ProjectReference::new("B", "C")];
        graph.propagate_references(&references);

        let a = graph.scope("A").unwrap();
        assert!(a.contains("Mid"));
        assert!(a.contains("Core"));
    }

    #[test]
    fn test_propagate_references_cycle_reaches_fixed_point() {
        let mut graph = DependencyGraph::new();
        graph.record_dependency("A", "X", &v("1.0"));
        graph.record_dependency("B", "Y", &v("2.0"));
        graph.record_dependency("C", "Z", &v("3.0"));

        let references = vec![
            ProjectReference::new("A", "B"),
            ProjectReference::new("B", "C"),
            ProjectReference::new("C", "A"),
        ];
        graph.propagate_references(&references);

        for project in ["A", "B", "C"] {
            let scope = graph.scope(project).unwrap();
            assert!(scope.contains("X") && scope.contains("Y") && scope.contains("Z"));
        }
    }

    #[test]
    fn test_issues_in_insertion_order() {
        let mut graph = DependencyGraph::new();
        graph.record_issue("P", IssueKind::MissingPackagesConfig, None);
        graph.record_issue("Q", IssueKind::InvalidVersion, Some("A:x".to_string()));
        graph.record_issue("Q", IssueKind::InvalidVersion, Some("A:x".to_string()));

        let kinds: Vec<_> = graph.issues().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingPackagesConfig,
                IssueKind::InvalidVersion,
                IssueKind::InvalidVersion
            ]
        );
        assert_eq!(graph.project_count(), 0);
    }
}
