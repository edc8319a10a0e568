//! Project file discovery
//!
//! Walks the analyzed directory for `*.csproj` files, skipping build output
//! (`bin/`, `obj/`) and hidden directories.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &["bin", "obj"];

/// Detect all project files under `root`, sorted by path
pub fn detect_projects(root: &Path) -> Vec<PathBuf> {
    let mut projects: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_project_file(e.path()))
        .map(DirEntry::into_path)
        .collect();

    projects.sort();
    debug!(root = %root.display(), count = projects.len(), "detected project files");
    projects
}

/// Returns true if `path` names a C# project file
pub fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csproj"))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.iter().any(|s| name.eq_ignore_ascii_case(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, relative: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<Project />").unwrap();
    }

    #[test]
    fn test_detect_projects_recursive_and_sorted() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/Web/Web.csproj");
        touch(temp.path(), "src/Core/Core.csproj");
        touch(temp.path(), "Root.csproj");

        let projects = detect_projects(temp.path());
        let names: Vec<_> = projects
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["Root.csproj", "src/Core/Core.csproj", "src/Web/Web.csproj"]);
    }

    #[test]
    fn test_detect_projects_skips_build_output() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "App/App.csproj");
        touch(temp.path(), "App/bin/Debug/Copy.csproj");
        touch(temp.path(), "App/obj/Other.csproj");
        touch(temp.path(), ".git/Hidden.csproj");

        let projects = detect_projects(temp.path());
        assert_eq!(projects.len(), 1);
        assert!(projects[0].ends_with("App/App.csproj"));
    }

    #[test]
    fn test_detect_projects_ignores_other_files() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "App/App.vbproj");
        touch(temp.path(), "App/packages.config");
        touch(temp.path(), "Lib/Lib.CSPROJ");

        let projects = detect_projects(temp.path());
        assert_eq!(projects.len(), 1);
        assert!(projects[0].ends_with("Lib/Lib.CSPROJ"));
    }

    #[test]
    fn test_detect_projects_empty_dir() {
        let temp = TempDir::new().unwrap();
        assert!(detect_projects(temp.path()).is_empty());
    }
}
