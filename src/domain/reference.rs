//! Project-to-project edges and derived `(project, package, version)` rows

use super::NuGetVersion;
use serde::Serialize;
use std::fmt;

/// A `ProjectReference` discovered in a project file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectReference {
    /// The referencing project
    pub project: String,
    /// The referenced project
    pub referenced: String,
}

impl ProjectReference {
    pub fn new(project: impl Into<String>, referenced: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            referenced: referenced.into(),
        }
    }
}

/// A package version attributed to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPackage {
    pub project: String,
    pub package: String,
    pub version: NuGetVersion,
}

impl ProjectPackage {
    pub fn new(project: impl Into<String>, package: impl Into<String>, version: NuGetVersion) -> Self {
        Self {
            project: project.into(),
            package: package.into(),
            version,
        }
    }
}

impl fmt::Display for ProjectPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} => {}", self.project, self.package, self.version)
    }
}
