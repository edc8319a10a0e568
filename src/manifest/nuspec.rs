//! `.nuspec` reading, from a file or from inside a `.nupkg` archive
//!
//! Only the `<dependencies>` section is read. Dependencies are either grouped
//! per target framework (`<group targetFramework="...">`) or listed directly
//! under `<dependencies>` in older packages.

use super::{strip_bom, xml_attribute};
use crate::domain::TargetFramework;
use crate::error::ScanError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A `<dependency id version>` element; `range` is the raw version text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NuspecDependency {
    pub id: String,
    pub range: String,
}

/// A `<group>` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGroup {
    /// Raw `targetFramework` attribute, if present and non-blank
    pub target_framework: Option<String>,
    pub dependencies: Vec<NuspecDependency>,
}

/// The dependency declarations of one package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nuspec {
    pub groups: Vec<DependencyGroup>,
    /// `<dependency>` children placed directly under `<dependencies>`
    pub ungrouped: Vec<NuspecDependency>,
}

impl Nuspec {
    /// Parse nuspec `content`; `source` names the file for error messages
    pub fn parse(source: &Path, content: &str) -> Result<Self, ScanError> {
        let mut reader = Reader::from_str(strip_bom(content));
        reader.config_mut().trim_text(true);

        let mut nuspec = Nuspec::default();
        let mut path: Vec<String> = Vec::new();

        loop {
            let (element, is_empty) = match reader.read_event() {
                Ok(Event::Start(e)) => (e, false),
                Ok(Event::Empty(e)) => (e, true),
                Ok(Event::End(_)) => {
                    path.pop();
                    continue;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ScanError::xml_parse_error(source, e.to_string())),
                _ => continue,
            };

            let name = String::from_utf8_lossy(element.local_name().as_ref()).to_string();
            let attribute = |key: &str| {
                xml_attribute(&element, key).map_err(|message| ScanError::xml_parse_error(source, message))
            };
            let parent = path.last().map(String::as_str);
            let grandparent = path.len().checked_sub(2).map(|i| path[i].as_str());

            match (name.as_str(), parent, grandparent) {
                ("group", Some("dependencies"), _) => {
                    let target_framework = attribute("targetFramework")?
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty());
                    nuspec.groups.push(DependencyGroup {
                        target_framework,
                        dependencies: Vec::new(),
                    });
                }
                ("dependency", Some("group"), Some("dependencies")) => {
                    let dependency = read_dependency(attribute("id")?, attribute("version")?);
                    if let (Some(dependency), Some(group)) = (dependency, nuspec.groups.last_mut()) {
                        group.dependencies.push(dependency);
                    }
                }
                ("dependency", Some("dependencies"), _) => {
                    if let Some(dependency) = read_dependency(attribute("id")?, attribute("version")?) {
                        nuspec.ungrouped.push(dependency);
                    }
                }
                _ => {}
            }

            if !is_empty {
                path.push(name);
            }
        }

        Ok(nuspec)
    }

    /// Read `<id>.nuspec` from the package archive at `archive_path`
    ///
    /// Returns `Ok(None)` when the archive has no such entry. The entry name is
    /// matched exactly first, then ignoring case.
    pub fn from_package(archive_path: &Path, id: &str) -> Result<Option<Self>, ScanError> {
        let file = File::open(archive_path).map_err(|e| ScanError::read_error(archive_path, e))?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| ScanError::archive_error(archive_path, e.to_string()))?;

        let expected = format!("{}.nuspec", id);
        let entry_name = archive
            .file_names()
            .find(|n| *n == expected)
            .or_else(|| archive.file_names().find(|n| n.eq_ignore_ascii_case(&expected)))
            .map(str::to_string);
        let Some(entry_name) = entry_name else {
            debug!(archive = %archive_path.display(), entry = %expected, "nuspec entry not found");
            return Ok(None);
        };

        let mut entry = archive
            .by_name(&entry_name)
            .map_err(|e| ScanError::archive_error(archive_path, e.to_string()))?;
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| ScanError::archive_error(archive_path, format!("{}: {}", entry_name, e)))?;

        Self::parse(archive_path, &content).map(Some)
    }

    /// Dependencies that apply to a project targeting `framework`
    ///
    /// Picks the group whose framework is nearest to `framework`; failing that,
    /// the group without a `targetFramework`. Packages without groups use their
    /// ungrouped dependencies.
    pub fn dependencies_for(&self, framework: &TargetFramework) -> &[NuspecDependency] {
        if self.groups.is_empty() {
            return &self.ungrouped;
        }

        let parsed: Vec<(usize, TargetFramework)> = self
            .groups
            .iter()
            .enumerate()
            .filter_map(|(i, g)| {
                let text = g.target_framework.as_deref()?;
                TargetFramework::parse(text).map(|tf| (i, tf))
            })
            .collect();

        if let Some(nearest) = framework.nearest(parsed.iter().map(|(_, tf)| tf)) {
            if let Some((index, _)) = parsed.iter().find(|(_, tf)| tf == nearest) {
                return &self.groups[*index].dependencies;
            }
        }

        self.groups
            .iter()
            .find(|g| g.target_framework.is_none())
            .map(|g| g.dependencies.as_slice())
            .unwrap_or(&[])
    }
}

fn read_dependency(id: Option<String>, version: Option<String>) -> Option<NuspecDependency> {
    let id = id?.trim().to_string();
    if id.is_empty() {
        return None;
    }
    Some(NuspecDependency {
        id,
        range: version.unwrap_or_default(),
    })
}
