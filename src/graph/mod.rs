//! Dependency aggregation
//!
//! This module provides:
//! - Case-insensitive per-scope version envelopes ([`DependencyScope`])
//! - The tree-wide and per-project aggregate ([`DependencyGraph`])
//! - Ordered propagation of dependencies across project references

mod dependency_graph;
mod propagation;
mod scope;

pub use dependency_graph::DependencyGraph;
pub use scope::DependencyScope;

/// Case folding used for package and project identity
pub(crate) fn fold_key(name: &str) -> String {
    name.to_lowercase()
}
