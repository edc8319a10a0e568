//! Integration tests for nuscan
//!
//! These tests verify:
//! - Project discovery across a solution tree
//! - Legacy (packages.config + nuspec) and SDK (project.assets.json) scanning
//! - Reference propagation and the three report views
//! - Issue collection for skipped projects and declarations

mod common;

use nuscan::cli::AnalyzeArgs;
use nuscan::config::Settings;
use nuscan::domain::IssueKind;
use nuscan::orchestrator::{AnalysisResult, Orchestrator};
use nuscan::report::{Report, ReportKind};
use std::path::Path;

async fn analyze(root: &Path, framework: &str) -> AnalysisResult {
    let args = AnalyzeArgs {
        directory: root.to_path_buf(),
        framework: Some(framework.to_string()),
        ..AnalyzeArgs::default()
    };
    let settings = Settings::from_cli(&args).expect("settings should resolve");
    Orchestrator::new(settings)
        .run()
        .await
        .expect("analysis should succeed")
}

/// Flatten a report into `(project name, package, version)` lines
fn lines(report: &Report) -> Vec<(String, String, String)> {
    report
        .projects
        .iter()
        .flat_map(|p| {
            p.entries
                .iter()
                .map(move |e| (p.name.clone(), e.package.clone(), e.version.to_string()))
        })
        .collect()
}

fn line(project: &str, package: &str, version: &str) -> (String, String, String) {
    (project.to_string(), package.to_string(), version.to_string())
}

mod discovery {
    use super::*;
    use nuscan::manifest::detect_projects;

    #[test]
    fn test_detect_solution_projects() {
        let temp = common::solution();
        let projects = detect_projects(temp.path());
        let names: Vec<_> = projects
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["Api.csproj", "Legacy.csproj", "Modern.csproj", "Old.csproj"]);
    }

    #[test]
    fn test_build_output_is_ignored() {
        let temp = common::solution();
        common::write(temp.path(), "Api/bin/Debug/Copy.csproj", common::SDK_PROJECT);
        common::write(temp.path(), "Api/obj/Generated.csproj", common::SDK_PROJECT);
        assert_eq!(detect_projects(temp.path()).len(), 4);
    }
}

mod reports {
    use super::*;

    #[tokio::test]
    async fn test_binding_redirects() {
        let temp = common::solution();
        let result = analyze(temp.path(), "net472").await;
        let report = result.report(ReportKind::Redirects);
        assert_eq!(lines(&report), [line("Legacy", "Newtonsoft.Json", "12.0.3")]);
    }

    #[tokio::test]
    async fn test_package_upgrades() {
        let temp = common::solution();
        let result = analyze(temp.path(), "net472").await;
        let report = result.report(ReportKind::Upgrades);
        assert_eq!(lines(&report), [line("Api", "Serilog", "2.10.0")]);
    }

    #[tokio::test]
    async fn test_resolved_dependencies() {
        let temp = common::solution();
        let result = analyze(temp.path(), "net472").await;
        let report = result.report(ReportKind::Dependencies);
        assert_eq!(
            lines(&report),
            [
                line("Api", "Serilog", "2.8.0"),
                line("Legacy", "Logging.Core", "1.2.0"),
                line("Legacy", "Missing.Pkg", "1.0.0"),
                line("Legacy", "Newtonsoft.Json", "12.0.3"),
                line("Legacy", "Serilog", "2.10.0"),
                line("Modern", "Newtonsoft.Json", "12.0.3"),
                line("Modern", "Serilog", "2.10.0"),
            ]
        );
    }

    #[tokio::test]
    async fn test_absolute_project_reference_propagates() {
        let temp = common::solution();
        let modern = temp
            .path()
            .canonicalize()
            .unwrap()
            .join("Modern")
            .join("Modern.csproj");
        common::write(
            temp.path(),
            "Api/Api.csproj",
            &format!(
                r#"<Project Sdk="Microsoft.NET.Sdk"><ItemGroup><ProjectReference Include="{}" /></ItemGroup></Project>"#,
                modern.display()
            ),
        );

        let result = analyze(temp.path(), "net472").await;
        let report = result.report(ReportKind::Redirects);
        assert_eq!(
            lines(&report),
            [
                line("Api", "Serilog", "2.10.0"),
                line("Legacy", "Newtonsoft.Json", "12.0.3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_nuspec_group_follows_framework() {
        let temp = common::solution();
        // Only the netstandard group applies to netcoreapp, and Modern has no net6.0 target
        let result = analyze(temp.path(), "netcoreapp3.1").await;
        let legacy = result
            .graph
            .scope(
                &temp
                    .path()
                    .canonicalize()
                    .unwrap()
                    .join("Legacy")
                    .join("Legacy.csproj")
                    .display()
                    .to_string(),
            )
            .expect("legacy project should have a scope");
        let newtonsoft = legacy.get("Newtonsoft.Json").unwrap();
        assert_eq!(newtonsoft.min().to_string(), "9.0.1");
        assert_eq!(newtonsoft.max().to_string(), "11.0.1");
    }

    #[tokio::test]
    async fn test_reports_are_case_insensitive_by_package() {
        let temp = common::solution();
        common::write(
            temp.path(),
            "Api/obj/project.assets.json",
            &common::assets_json(&[("serilog", "2.8.0"), ("SERILOG.Sinks.File", "5.0.0")]),
        );
        let result = analyze(temp.path(), "net472").await;
        let report = result.report(ReportKind::Upgrades);
        assert_eq!(lines(&report), [line("Api", "serilog", "2.10.0")]);
    }
}

mod issues {
    use super::*;

    #[tokio::test]
    async fn test_issue_collection() {
        let temp = common::solution();
        let result = analyze(temp.path(), "net472").await;
        let issues = result.graph.issues();

        assert_eq!(issues.count(IssueKind::MissingPackagesConfig), 1);
        assert_eq!(issues.count(IssueKind::InvalidVersion), 1);
        assert_eq!(issues.count(IssueKind::MissingPackageArchive), 2);
        assert_eq!(issues.count(IssueKind::MissingNuspec), 0);
        assert_eq!(issues.count(IssueKind::MissingAssetsJson), 0);
        assert!(result.errors.is_empty());

        let invalid = issues
            .iter()
            .find(|r| r.kind == IssueKind::InvalidVersion)
            .unwrap();
        assert!(invalid.project.ends_with("Legacy.csproj"));
        assert_eq!(invalid.detail.as_deref(), Some("Bad:1.x"));
    }

    #[tokio::test]
    async fn test_archive_without_nuspec() {
        let temp = common::solution();
        let dir = temp.path().join("packages").join("Missing.Pkg.1.0.0");
        std::fs::create_dir_all(&dir).unwrap();
        let file = std::fs::File::create(dir.join("Missing.Pkg.1.0.0.nupkg")).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("lib/net45/Missing.Pkg.dll", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.finish().unwrap();

        let result = analyze(temp.path(), "net472").await;
        assert_eq!(result.graph.issues().count(IssueKind::MissingNuspec), 1);
        assert_eq!(result.graph.issues().count(IssueKind::MissingPackageArchive), 1);
    }

    #[tokio::test]
    async fn test_missing_assets_json() {
        let temp = common::solution();
        std::fs::remove_dir_all(temp.path().join("Modern").join("obj")).unwrap();

        let result = analyze(temp.path(), "net472").await;
        assert_eq!(result.graph.issues().count(IssueKind::MissingAssetsJson), 1);

        // Without Modern's packages there is nothing to propagate into Legacy
        let report = result.report(ReportKind::Redirects);
        assert_eq!(lines(&report), [line("Legacy", "Newtonsoft.Json", "10.0.1")]);
    }

    #[tokio::test]
    async fn test_corrupt_files_are_reported_not_fatal() {
        let temp = common::solution();
        common::write(temp.path(), "Modern/obj/project.assets.json", "{ not json");
        common::write(
            temp.path(),
            "packages/Logging.Core.1.2.0/Logging.Core.1.2.0.nupkg",
            "not a zip archive",
        );

        let result = analyze(temp.path(), "net472").await;
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.project_count, 4);

        let report = result.report(ReportKind::Dependencies);
        assert!(lines(&report).contains(&line("Api", "Serilog", "2.8.0")));
    }
}

mod config {
    use super::*;
    use nuscan::config::CONFIG_FILE_NAME;

    #[tokio::test]
    async fn test_config_file_supplies_framework_and_packages_dir() {
        let temp = common::solution();
        std::fs::rename(temp.path().join("packages"), temp.path().join("restored")).unwrap();
        common::write(
            temp.path(),
            CONFIG_FILE_NAME,
            "framework = \"net472\"\npackages_dir = \"restored\"\nconcurrency = 2\n",
        );

        let args = AnalyzeArgs {
            directory: temp.path().to_path_buf(),
            ..AnalyzeArgs::default()
        };
        let settings = Settings::from_cli(&args).unwrap();
        assert_eq!(settings.concurrency, 2);

        let result = Orchestrator::new(settings).run().await.unwrap();
        let report = result.report(ReportKind::Redirects);
        assert_eq!(lines(&report), [line("Legacy", "Newtonsoft.Json", "12.0.3")]);
        assert_eq!(result.graph.issues().count(IssueKind::MissingPackageArchive), 2);
    }
}
