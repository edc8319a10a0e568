//! Ordering of project-reference propagation
//!
//! A referencing project must receive a referenced project's envelope only
//! after that envelope is complete, i.e. after the referenced project has
//! itself absorbed everything it references.

use super::fold_key;
use crate::domain::ProjectReference;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// How a batch of references should be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PropagationPlan {
    /// Indices into the reference slice, referenced projects first
    Ordered(Vec<usize>),
    /// The reference graph has a cycle through this project; apply all
    /// references repeatedly until nothing changes
    FixedPoint { cycle_at: String },
}

/// Plans the order in which `references` should be propagated
///
/// Self-references are dropped; they never contribute anything.
pub(crate) fn plan(references: &[ProjectReference]) -> PropagationPlan {
    let mut graph: DiGraph<&str, usize> = DiGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

    for (index, reference) in references.iter().enumerate() {
        let from_key = fold_key(&reference.project);
        let to_key = fold_key(&reference.referenced);
        if from_key == to_key {
            continue;
        }
        let from = *nodes
            .entry(from_key)
            .or_insert_with(|| graph.add_node(reference.project.as_str()));
        let to = *nodes
            .entry(to_key)
            .or_insert_with(|| graph.add_node(reference.referenced.as_str()));
        graph.add_edge(from, to, index);
    }

    match toposort(&graph, None) {
        Ok(order) => {
            // toposort lists referencing projects before the projects they reference
            let mut indices = Vec::with_capacity(graph.edge_count());
            for node in order.into_iter().rev() {
                let mut outgoing: Vec<usize> = graph
                    .edges_directed(node, Direction::Outgoing)
                    .map(|edge| *edge.weight())
                    .collect();
                outgoing.sort_unstable();
                indices.extend(outgoing);
            }
            PropagationPlan::Ordered(indices)
        }
        Err(cycle) => PropagationPlan::FixedPoint {
            cycle_at: graph[cycle.node_id()].to_string(),
        },
    }
}
