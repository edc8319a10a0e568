//! packages.config scanning for legacy projects
//!
//! Each `<package id version>` is recorded directly, then the nested
//! dependencies of the package are read from the `.nuspec` inside its local
//! `.nupkg` archive.

use super::{package_detail, strip_bom, xml_attribute, Nuspec, ProjectFile, ProjectScan, ProjectScanner, ProjectStyle, ScanContext};
use crate::domain::{IssueKind, NuGetVersion};
use crate::error::ScanError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;
use tracing::debug;

/// File name looked up beside the project file
pub const PACKAGES_CONFIG: &str = "packages.config";

/// One `<package>` element; `version` is the raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub id: String,
    pub version: String,
}

/// Parse the `<package>` elements of a packages.config file
///
/// Elements without an `id` are ignored.
pub fn parse_packages_config(path: &Path, content: &str) -> Result<Vec<PackageEntry>, ScanError> {
    let mut reader = Reader::from_str(strip_bom(content));
    reader.config_mut().trim_text(true);

    let mut packages = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"package" => {
                let attribute = |name: &str| {
                    xml_attribute(e, name).map_err(|message| ScanError::xml_parse_error(path, message))
                };
                let id = attribute("id")?.map(|id| id.trim().to_string()).unwrap_or_default();
                if id.is_empty() {
                    debug!(path = %path.display(), "ignoring package element without id");
                    continue;
                }
                let version = attribute("version")?.unwrap_or_default();
                packages.push(PackageEntry { id, version });
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ScanError::xml_parse_error(path, e.to_string())),
            _ => {}
        }
    }
    Ok(packages)
}

/// Scanner for legacy projects
pub struct PackagesConfigScanner;

impl ProjectScanner for PackagesConfigScanner {
    fn style(&self) -> ProjectStyle {
        ProjectStyle::Legacy
    }

    fn scan(&self, project: &ProjectFile, ctx: &ScanContext, scan: &mut ProjectScan) -> Result<(), ScanError> {
        let config_path = project.directory().join(PACKAGES_CONFIG);
        if !config_path.is_file() {
            scan.issue(IssueKind::MissingPackagesConfig, None);
            return Ok(());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ScanError::read_error(&config_path, e))?;
        let packages = parse_packages_config(&config_path, &content)?;
        debug!(path = %config_path.display(), packages = packages.len(), "read packages.config");

        for package in &packages {
            match NuGetVersion::parse(&package.version) {
                Some(version) => scan.dependency(&package.id, version),
                None => scan.invalid_version(&package.id, &package.version),
            }
            scan_package_archive(package, ctx, scan);
        }
        Ok(())
    }
}

/// Records the nested dependencies declared by a package's local archive
fn scan_package_archive(package: &PackageEntry, ctx: &ScanContext, scan: &mut ProjectScan) {
    let detail = || Some(package_detail(&package.id, &package.version));
    let archive = ctx.package_archive(&package.id, &package.version);
    if !archive.is_file() {
        scan.issue(IssueKind::MissingPackageArchive, detail());
        return;
    }

    match Nuspec::from_package(&archive, &package.id) {
        Ok(Some(nuspec)) => {
            for dependency in nuspec.dependencies_for(&ctx.framework) {
                scan.dependency_range(&dependency.id, &dependency.range);
            }
        }
        Ok(None) => scan.issue(IssueKind::MissingNuspec, detail()),
        Err(e) => scan.error(e),
    }
}
