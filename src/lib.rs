//! nuscan - NuGet dependency analyzer library
//!
//! This library scans a tree of .NET projects and derives three views over
//! the packages they use:
//! - Binding redirects (a project sees more than one version of a package)
//! - Package upgrades (a project is behind the highest version in the tree)
//! - Resolved dependencies (the version each project ends up with)
//!
//! Legacy projects are read through packages.config and the .nuspec files of
//! restored packages; SDK-style projects through obj/project.assets.json.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod report;
