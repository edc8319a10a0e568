//! nuscan - NuGet dependency analyzer CLI tool
//!
//! Reports binding redirects, package upgrades and resolved dependencies
//! for every .csproj under a directory.

use clap::Parser;
use nuscan::cli::CliArgs;
use nuscan::config::Settings;
use nuscan::orchestrator::Orchestrator;
use nuscan::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the verbosity-based default
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "nuscan=debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let analyze = args.command.analyze_args();
    let settings = Settings::from_cli(analyze)?;

    if args.verbose {
        eprintln!("nuscan v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", settings.root.display());
        eprintln!("Framework: {}", settings.framework);
        eprintln!("Packages: {}", settings.packages_dir.display());
    }

    // Create and run the orchestrator
    let show_progress = !args.quiet && !args.json;
    let orchestrator = Orchestrator::new(settings).with_progress(show_progress);
    let result = orchestrator.run().await?;
    let report = result.report(args.command.report_kind());

    // Create output formatter based on CLI options
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.no_color);
    let formatter = create_formatter(output_config);

    // Output results
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &report, &mut stdout)?;
    stdout.flush()?;

    // Issues and skipped files are part of the report, not failures
    Ok(ExitCode::SUCCESS)
}
