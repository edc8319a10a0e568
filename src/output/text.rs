//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Issue listing grouped by kind, each under its description sentence
//! - Report listing: project name, then `package => version` lines
//! - Scan errors and a summary line in verbose mode

use crate::domain::IssueLog;
use crate::orchestrator::AnalysisResult;
use crate::output::{issue_description, OutputFormatter, Verbosity};
use crate::report::Report;
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Write issues grouped by kind, followed by a blank line
    fn format_issues(&self, issues: &IssueLog, writer: &mut dyn Write) -> std::io::Result<()> {
        if issues.is_empty() {
            return Ok(());
        }

        for (kind, records) in issues.grouped() {
            let description = issue_description(kind);
            if self.color {
                writeln!(writer, "{}", description.yellow())?;
            } else {
                writeln!(writer, "{}", description)?;
            }
            for record in records {
                writeln!(writer, "  {}", record)?;
            }
        }

        writeln!(writer)?;
        Ok(())
    }

    /// Write the report, or its empty message
    fn format_report(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        if report.is_empty() {
            if self.color {
                writeln!(writer, "{}", report.kind.empty_message().green())?;
            } else {
                writeln!(writer, "{}", report.kind.empty_message())?;
            }
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}", report.kind.heading().bold())?;
        } else {
            writeln!(writer, "{}", report.kind.heading())?;
        }

        for project in &report.projects {
            if self.color {
                writeln!(writer, "  {}", project.name.cyan().bold())?;
            } else {
                writeln!(writer, "  {}", project.name)?;
            }
            for entry in &project.entries {
                if self.color {
                    writeln!(
                        writer,
                        "    {} {} {}",
                        entry.package,
                        "=>".dimmed(),
                        entry.version.to_string().bright_white().bold()
                    )?;
                } else {
                    writeln!(writer, "    {} => {}", entry.package, entry.version)?;
                }
            }
        }
        Ok(())
    }

    /// Write scan errors and a one-line summary
    fn format_details(&self, result: &AnalysisResult, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer)?;

        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}", "Skipped unreadable files:".red())?;
            } else {
                writeln!(writer, "Skipped unreadable files:")?;
            }
            for error in &result.errors {
                writeln!(writer, "  {}", error)?;
            }
            writeln!(writer)?;
        }

        let summary = format!(
            "Scanned {} {} for {}: {} {}, {} {}, {} {}",
            result.project_count,
            plural(result.project_count, "project", "projects"),
            result.framework,
            report.entry_count(),
            plural(report.entry_count(), "entry", "entries"),
            result.graph.issues().len(),
            plural(result.graph.issues().len(), "issue", "issues"),
            result.errors.len(),
            plural(result.errors.len(), "error", "errors"),
        );
        if self.color {
            writeln!(writer, "{}", summary.dimmed())
        } else {
            writeln!(writer, "{}", summary)
        }
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &AnalysisResult, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            self.format_issues(result.graph.issues(), writer)?;
        }

        self.format_report(report, writer)?;

        if self.verbosity == Verbosity::Verbose {
            self.format_details(result, report, writer)?;
        }
        Ok(())
    }
}
