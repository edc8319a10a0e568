//! Output formatting for analysis results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::domain::IssueKind;
use crate::orchestrator::AnalysisResult;
use crate::report::Report;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Report only
    Quiet,
    /// Issues and report
    #[default]
    Normal,
    /// Issues, report, scan errors and a summary line
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(format: OutputFormat, verbosity: Verbosity) -> Self {
        Self {
            format,
            verbosity,
            color: true,
        }
    }

    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool, no_color: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: !no_color,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the issues of `result` followed by `report`
    fn format(&self, result: &AnalysisResult, report: &Report, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}

/// Sentence printed above the projects affected by an issue kind
pub fn issue_description(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::MissingPackagesConfig => {
            "The following projects do not have a packages.config file and were skipped"
        }
        IssueKind::MissingAssetsJson => {
            "The following projects do not have a project.assets.json file and were skipped"
        }
        IssueKind::InvalidVersion => {
            "The following projects had an invalid version and that dependency was skipped"
        }
        IssueKind::MissingPackageArchive => {
            "The following projects had missing NuGet package and its dependencies were skipped"
        }
        IssueKind::MissingNuspec => {
            "The following projects did not have a .nuspec file in the NuGet package and its dependencies were skipped"
        }
    }
}
