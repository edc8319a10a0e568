//! CLI argument parsing module for nuscan

use crate::report::ReportKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a concurrency limit, rejecting zero
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;
    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    Ok(value)
}

/// NuGet dependency analyzer for .NET project trees
#[derive(Parser, Debug, Clone)]
#[command(
    name = "nuscan",
    version,
    about = "Find binding redirects, package upgrades and resolved NuGet dependencies"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    // Output options
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - only the report is printed
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Analysis to run
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the resolved version of every package per project
    Dependencies(AnalyzeArgs),
    /// List projects that reference a package below its highest version in the tree
    Packages(AnalyzeArgs),
    /// List projects that need binding redirects
    Redirects(AnalyzeArgs),
}

/// Arguments shared by every analysis
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Directory to analyze (default: current directory)
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Target framework, e.g. net472, netstandard2.0 or net6.0
    pub framework: Option<String>,

    /// Directory holding restored packages (default: <DIRECTORY>/packages)
    #[arg(long)]
    pub packages_dir: Option<PathBuf>,

    /// Config file (default: <DIRECTORY>/nuscan.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of projects scanned at once
    #[arg(short = 'j', long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,
}

impl Command {
    /// Report produced by this command
    pub fn report_kind(&self) -> ReportKind {
        match self {
            Command::Dependencies(_) => ReportKind::Dependencies,
            Command::Packages(_) => ReportKind::Upgrades,
            Command::Redirects(_) => ReportKind::Redirects,
        }
    }

    pub fn analyze_args(&self) -> &AnalyzeArgs {
        match self {
            Command::Dependencies(args) | Command::Packages(args) | Command::Redirects(args) => args,
        }
    }
}
