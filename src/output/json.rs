//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of one report view
//! - Issue records and skipped files next to the report

use crate::domain::{IssueRecord, TargetFramework};
use crate::orchestrator::AnalysisResult;
use crate::output::{OutputFormatter, Verbosity};
use crate::report::{ProjectReport, Report, ReportKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    generated_at: DateTime<Utc>,
    /// Analyzed directory
    root: String,
    framework: &'a TargetFramework,
    /// Number of project files discovered
    project_count: usize,
    report: JsonReport<'a>,
    /// Issue records in insertion order (omitted in quiet mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<&'a [IssueRecord]>,
    /// Files that could not be read or parsed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<JsonError>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    kind: ReportKind,
    heading: &'static str,
    projects: &'a [ProjectReport],
}

#[derive(Serialize)]
struct JsonError {
    path: String,
    message: String,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &AnalysisResult, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        let issues = (self.verbosity != Verbosity::Quiet).then(|| result.graph.issues().records());

        let output = JsonOutput {
            generated_at: Utc::now(),
            root: result.root.display().to_string(),
            framework: &result.framework,
            project_count: result.project_count,
            report: JsonReport {
                kind: report.kind,
                heading: if report.is_empty() {
                    report.kind.empty_message()
                } else {
                    report.kind.heading()
                },
                projects: &report.projects,
            },
            issues,
            errors: result
                .errors
                .iter()
                .map(|e| JsonError {
                    path: e.path().display().to_string(),
                    message: e.to_string(),
                })
                .collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)?;
        Ok(())
    }
}
