//! Core domain models for nuscan
//!
//! This module contains the fundamental types used throughout the application:
//! - NuGet versions and the version envelopes built from them
//! - Target frameworks and nearest-group selection
//! - Issue records for skipped declarations
//! - Project references and derived project/package rows

mod framework;
mod interval;
mod issue;
mod reference;
mod version;

pub use framework::{FrameworkFamily, TargetFramework};
pub use interval::VersionInterval;
pub use issue::{IssueKind, IssueLog, IssueRecord};
pub use reference::{ProjectPackage, ProjectReference};
pub use version::NuGetVersion;
