//! `.csproj` reading: project style and project references

use super::{normalize_path, strip_bom, xml_attribute};
use crate::error::ScanError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// How a project declares its packages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStyle {
    /// `<Project Sdk="...">`, restored into obj/project.assets.json
    Sdk,
    /// Classic project with a packages.config file
    Legacy,
}

impl ProjectStyle {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStyle::Sdk => "sdk",
            ProjectStyle::Legacy => "legacy",
        }
    }
}

/// A parsed project file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub path: PathBuf,
    pub style: ProjectStyle,
    /// Referenced project files, resolved against this project's directory
    pub references: Vec<PathBuf>,
}

impl ProjectFile {
    /// Read and parse the project file at `path`
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScanError::read_error(path, e))?;
        Self::parse(path, &content)
    }

    /// Parse project file `content` read from `path`
    pub fn parse(path: &Path, content: &str) -> Result<Self, ScanError> {
        let mut reader = Reader::from_str(strip_bom(content));
        reader.config_mut().trim_text(true);

        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        let mut style: Option<ProjectStyle> = None;
        let mut references = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let attribute = |name: &str| {
                        xml_attribute(e, name).map_err(|message| ScanError::xml_parse_error(path, message))
                    };

                    if style.is_none() {
                        style = Some(match attribute("Sdk")? {
                            Some(_) => ProjectStyle::Sdk,
                            None => ProjectStyle::Legacy,
                        });
                    }

                    if e.local_name().as_ref() == b"ProjectReference" {
                        if let Some(include) = attribute("Include")? {
                            let include = include.trim();
                            if !include.is_empty() {
                                references.push(resolve_reference(directory, include));
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ScanError::xml_parse_error(path, e.to_string()));
                }
                _ => {}
            }
        }

        let style = style.ok_or_else(|| ScanError::xml_parse_error(path, "no root element"))?;
        Ok(Self {
            path: path.to_path_buf(),
            style,
            references,
        })
    }

    /// Directory containing the project file
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Resolves an `Include` path written with either separator
///
/// Rooted paths (`/repo/...`, `\repo\...`) and drive paths (`C:\...`)
/// replace the project directory instead of extending it.
fn resolve_reference(directory: &Path, include: &str) -> PathBuf {
    let mut segments = include.split(['\\', '/']).peekable();

    let mut resolved = match segments.peek() {
        Some(first) if is_drive(first) => {
            let drive = format!("{}{}", first, MAIN_SEPARATOR);
            segments.next();
            PathBuf::from(drive)
        }
        Some(first) if first.is_empty() => PathBuf::from(MAIN_SEPARATOR_STR),
        _ => directory.to_path_buf(),
    };

    for segment in segments.filter(|s| !s.is_empty()) {
        resolved.push(segment);
    }
    normalize_path(&resolved)
}

/// Returns true for a Windows drive designator such as `C:`
fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
