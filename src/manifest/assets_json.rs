//! obj/project.assets.json scanning for SDK-style projects
//!
//! The restore output lists, per target framework, every resolved library
//! (`"Name/1.2.3"`) with the ranges it declares for its own dependencies.

use super::{strip_bom, ProjectFile, ProjectScan, ProjectScanner, ProjectStyle, ScanContext};
use crate::domain::{IssueKind, NuGetVersion, TargetFramework};
use crate::error::ScanError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// The parts of project.assets.json read here
///
/// Targets and libraries keep their file order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetsFile {
    #[serde(default)]
    pub targets: Map<String, Value>,
}

/// One library entry of a target
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TargetLibrary {
    /// `package` or `project`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Dependency name to declared range
    #[serde(default)]
    pub dependencies: Map<String, Value>,
}

impl TargetLibrary {
    pub fn is_project(&self) -> bool {
        self.kind.as_deref().is_some_and(|k| k.eq_ignore_ascii_case("project"))
    }

    /// Declared dependency ranges as text, in file order
    pub fn dependency_ranges(&self) -> impl Iterator<Item = (&str, String)> {
        self.dependencies.iter().map(|(name, value)| {
            let range = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.as_str(), range)
        })
    }
}

impl AssetsFile {
    /// Parse assets file `content` read from `path`
    pub fn parse(path: &Path, content: &str) -> Result<Self, ScanError> {
        serde_json::from_str(strip_bom(content))
            .map_err(|e| ScanError::json_parse_error(path, e.to_string()))
    }

    /// The libraries of the first target built for `framework`
    ///
    /// Target keys may carry a runtime suffix (`net6.0/win-x64`).
    pub fn target(
        &self,
        path: &Path,
        framework: &TargetFramework,
    ) -> Result<Option<Vec<(String, TargetLibrary)>>, ScanError> {
        let Some((key, libraries)) = self.targets.iter().find(|(key, _)| {
            let name = key.split('/').next().unwrap_or_default();
            TargetFramework::parse(name).as_ref() == Some(framework)
        }) else {
            return Ok(None);
        };

        let Value::Object(libraries) = libraries else {
            return Err(ScanError::json_parse_error(path, format!("target '{}' is not an object", key)));
        };

        libraries
            .iter()
            .map(|(name, value)| {
                TargetLibrary::deserialize(value)
                    .map(|library| (name.clone(), library))
                    .map_err(|e| ScanError::json_parse_error(path, format!("library '{}': {}", name, e)))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

/// Scanner for SDK-style projects
pub struct AssetsJsonScanner;

impl ProjectScanner for AssetsJsonScanner {
    fn style(&self) -> ProjectStyle {
        ProjectStyle::Sdk
    }

    fn scan(&self, project: &ProjectFile, ctx: &ScanContext, scan: &mut ProjectScan) -> Result<(), ScanError> {
        let assets_path = project.directory().join("obj").join("project.assets.json");
        if !assets_path.is_file() {
            scan.issue(IssueKind::MissingAssetsJson, None);
            return Ok(());
        }

        let content = std::fs::read_to_string(&assets_path).map_err(|e| ScanError::read_error(&assets_path, e))?;
        let assets = AssetsFile::parse(&assets_path, &content)?;
        let Some(libraries) = assets.target(&assets_path, &ctx.framework)? else {
            debug!(path = %assets_path.display(), framework = %ctx.framework, "no matching target");
            return Ok(());
        };

        for (key, library) in &libraries {
            if library.is_project() {
                continue;
            }
            let mut parts = key.split('/');
            let name = parts.next().unwrap_or_default();
            let version_text = parts.next().unwrap_or_default();
            match NuGetVersion::parse(version_text) {
                Some(version) => scan.dependency(name, version),
                None => scan.invalid_version(name, version_text),
            }
            for (dependency, range) in library.dependency_ranges() {
                scan.dependency_range(dependency, &range);
            }
        }
        Ok(())
    }
}
