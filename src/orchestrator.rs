//! Analysis orchestrator for coordinating a whole run
//!
//! This module provides:
//! - Workflow coordination: detect → scan → record → propagate
//! - Parallel project scanning bounded by a semaphore
//! - Error handling with partial continuation (unreadable files never abort a run)
//!
//! Scans run concurrently but are applied to the graph sequentially in project
//! order, so results do not depend on scheduling.

use crate::config::Settings;
use crate::domain::TargetFramework;
use crate::error::{AppError, ScanError};
use crate::graph::DependencyGraph;
use crate::manifest::{detect_projects, scan_project, ProjectScan, ScanContext};
use crate::progress::{Progress, Ticker};
use crate::report::{Report, ReportKind};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Orchestrator for coordinating an analysis run
pub struct Orchestrator {
    settings: Settings,
    /// Whether to draw progress bars on stderr
    show_progress: bool,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct AnalysisResult {
    /// Canonical analyzed directory
    pub root: PathBuf,
    pub framework: TargetFramework,
    /// Number of project files discovered
    pub project_count: usize,
    /// Populated and propagated dependency graph
    pub graph: DependencyGraph,
    /// Unreadable or malformed files that were skipped
    pub errors: Vec<ScanError>,
}

impl AnalysisResult {
    /// Builds the `kind` view of the graph
    pub fn report(&self, kind: ReportKind) -> Report {
        Report::build(kind, &self.graph)
    }
}

impl Orchestrator {
    /// Create a new orchestrator with resolved settings
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            show_progress: false,
        }
    }

    /// Enable or disable progress display
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the analysis workflow
    pub async fn run(&self) -> Result<AnalysisResult, AppError> {
        let mut progress = Progress::new(self.show_progress);

        // Step 1: Detect project files
        progress.spinner("Detecting project files...");
        let root = self.settings.root.clone();
        let projects = tokio::task::spawn_blocking(move || detect_projects(&root))
            .await
            .map_err(|e| AppError::Task(e.to_string()))?;
        progress.finish_and_clear();
        info!(
            root = %self.settings.root.display(),
            framework = %self.settings.framework,
            projects = projects.len(),
            "starting analysis"
        );

        // Step 2: Scan projects concurrently
        progress.start(projects.len() as u64, "Scanning projects");
        let scans = self.scan_all(&projects, progress.ticker()).await?;
        progress.finish_and_clear();

        // Step 3: Record observations in project order, then propagate references
        let mut graph = DependencyGraph::new();
        let mut references = Vec::new();
        let mut errors = Vec::new();
        for scan in scans {
            scan.apply_to(&mut graph);
            references.extend(scan.references);
            errors.extend(scan.errors);
        }
        graph.propagate_references(&references);

        info!(
            projects = graph.project_count(),
            issues = graph.issues().len(),
            errors = errors.len(),
            "analysis finished"
        );

        Ok(AnalysisResult {
            root: self.settings.root.clone(),
            framework: self.settings.framework.clone(),
            project_count: projects.len(),
            graph,
            errors,
        })
    }

    /// Scan every project on blocking tasks, returning scans in input order
    async fn scan_all(&self, projects: &[PathBuf], ticker: Ticker) -> Result<Vec<ProjectScan>, AppError> {
        let semaphore = Arc::new(Semaphore::new(self.settings.concurrency));
        let ctx = Arc::new(ScanContext::new(
            self.settings.framework.clone(),
            self.settings.packages_dir.clone(),
        ));
        debug!(
            concurrency = self.settings.concurrency,
            packages_dir = %ctx.packages_dir.display(),
            "scanning projects"
        );

        let mut handles = Vec::with_capacity(projects.len());
        for path in projects {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| AppError::Task(e.to_string()))?;
            let ctx = Arc::clone(&ctx);
            let ticker = ticker.clone();
            let path = path.clone();

            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                if let Some(name) = path.file_name() {
                    ticker.set_message(&name.to_string_lossy());
                }
                let scan = scan_project(&path, &ctx);
                ticker.inc();
                scan
            }));
        }

        let mut scans = Vec::with_capacity(handles.len());
        for handle in handles {
            scans.push(handle.await.map_err(|e| AppError::Task(e.to_string()))?);
        }
        Ok(scans)
    }
}
