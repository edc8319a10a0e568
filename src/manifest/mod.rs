//! Project discovery and dependency scanning
//!
//! This module provides functionality to:
//! - Detect project files in a directory tree
//! - Classify projects as SDK-style or legacy and read their project references
//! - Read dependencies from packages.config plus the .nuspec inside each local .nupkg
//! - Read dependencies from obj/project.assets.json
//!
//! Scanning is pure with respect to the dependency graph: each project yields a
//! [`ProjectScan`] that is applied to the graph later, in project order.

mod assets_json;
mod detector;
mod nuspec;
mod packages_config;
mod project_file;

pub use assets_json::{AssetsFile, AssetsJsonScanner, TargetLibrary};
pub use detector::{detect_projects, is_project_file};
pub use nuspec::{DependencyGroup, Nuspec, NuspecDependency};
pub use packages_config::{parse_packages_config, PackageEntry, PackagesConfigScanner};
pub use project_file::{ProjectFile, ProjectStyle};

use crate::domain::{IssueKind, NuGetVersion, ProjectReference, TargetFramework};
use crate::error::ScanError;
use crate::graph::DependencyGraph;
use crate::parser::parse_range;
use quick_xml::events::BytesStart;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Inputs shared by every project scan in a run
#[derive(Debug, Clone)]
pub struct ScanContext {
    /// Framework whose dependency group/target is analyzed
    pub framework: TargetFramework,
    /// Directory holding `<id>.<version>/<id>.<version>.nupkg` folders
    pub packages_dir: PathBuf,
}

impl ScanContext {
    pub fn new(framework: TargetFramework, packages_dir: impl Into<PathBuf>) -> Self {
        Self {
            framework,
            packages_dir: packages_dir.into(),
        }
    }

    /// Location of the local archive for a packages.config entry
    pub fn package_archive(&self, id: &str, version: &str) -> PathBuf {
        let folder = format!("{}.{}", id, version);
        self.packages_dir
            .join(&folder)
            .join(format!("{}.nupkg", folder))
    }
}

/// One observation made while scanning a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Dependency {
        package: String,
        version: NuGetVersion,
    },
    Issue {
        kind: IssueKind,
        detail: Option<String>,
    },
}

/// Everything observed for one project, in discovery order
#[derive(Debug)]
pub struct ProjectScan {
    /// Normalized project file path
    pub project: String,
    pub events: Vec<ScanEvent>,
    pub references: Vec<ProjectReference>,
    /// Unreadable or malformed files met along the way
    pub errors: Vec<ScanError>,
}

impl ProjectScan {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            events: Vec::new(),
            references: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn dependency(&mut self, package: &str, version: NuGetVersion) {
        self.events.push(ScanEvent::Dependency {
            package: package.to_string(),
            version,
        });
    }

    pub fn issue(&mut self, kind: IssueKind, detail: Option<String>) {
        self.events.push(ScanEvent::Issue { kind, detail });
    }

    /// Records an `InvalidVersion` issue with `package:text` detail
    pub fn invalid_version(&mut self, package: &str, text: &str) {
        self.issue(IssueKind::InvalidVersion, Some(package_detail(package, text)));
    }

    /// Records a declared range: its lower bound, or an `InvalidVersion` issue
    pub fn dependency_range(&mut self, package: &str, range: &str) {
        match parse_range(range) {
            Some(version) => self.dependency(package, version),
            None => self.invalid_version(package, range),
        }
    }

    /// Records a scan error, logging it
    pub fn error(&mut self, error: ScanError) {
        warn!(project = %self.project, error = %error, "skipping unreadable file");
        self.errors.push(error);
    }

    pub fn dependency_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ScanEvent::Dependency { .. }))
            .count()
    }

    pub fn issue_count(&self) -> usize {
        self.events.len() - self.dependency_count()
    }

    /// Replays the observations into `graph`, in order
    pub fn apply_to(&self, graph: &mut DependencyGraph) {
        for event in &self.events {
            match event {
                ScanEvent::Dependency { package, version } => {
                    graph.record_dependency(&self.project, package, version);
                }
                ScanEvent::Issue { kind, detail } => {
                    graph.record_issue(&self.project, *kind, detail.clone());
                }
            }
        }
    }
}

/// Trait for reading the package dependencies of one project style
pub trait ProjectScanner: Send + Sync {
    /// Project style this scanner handles
    fn style(&self) -> ProjectStyle;

    /// Appends observations for `project` to `scan`
    ///
    /// An `Err` means the project's dependency source could not be read at all.
    /// Errors confined to a single package are pushed onto `scan.errors` instead.
    fn scan(&self, project: &ProjectFile, ctx: &ScanContext, scan: &mut ProjectScan) -> Result<(), ScanError>;
}

/// Get the scanner for the specified project style
pub fn get_scanner(style: ProjectStyle) -> Box<dyn ProjectScanner> {
    match style {
        ProjectStyle::Sdk => Box::new(AssetsJsonScanner),
        ProjectStyle::Legacy => Box::new(PackagesConfigScanner),
    }
}

/// Scan one project file
///
/// Never fails: unreadable files end up in [`ProjectScan::errors`].
pub fn scan_project(path: &Path, ctx: &ScanContext) -> ProjectScan {
    let path = normalize_path(path);
    let project_id = path.display().to_string();
    let mut scan = ProjectScan::new(project_id.clone());

    let project = match ProjectFile::load(&path) {
        Ok(project) => project,
        Err(e) => {
            scan.error(e);
            return scan;
        }
    };

    scan.references = project
        .references
        .iter()
        .map(|referenced| ProjectReference::new(project_id.clone(), referenced.display().to_string()))
        .collect();

    let scanner = get_scanner(project.style);
    debug!(project = %project_id, style = scanner.style().label(), "scanning project");
    if let Err(e) = scanner.scan(&project, ctx, &mut scan) {
        scan.error(e);
    }

    debug!(
        project = %project_id,
        dependencies = scan.dependency_count(),
        issues = scan.issue_count(),
        references = scan.references.len(),
        "scanned project"
    );
    scan
}

/// Lexically resolves `.` and `..` components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) && normalized.pop();
                if !popped && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// `package:text` detail used by package-level issues
pub(crate) fn package_detail(package: &str, text: &str) -> String {
    format!("{}:{}", package, text)
}

pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Value of the attribute named `name` (matched on its local name)
pub(crate) fn xml_attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, String> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
