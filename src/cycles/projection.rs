//! Projections of the application graph onto plain directed graphs.

use serde::Serialize;
use std::collections::BTreeMap;

use super::graph::DirectedGraph;
use crate::config::CycleDetectionConfig;
use crate::graph::{ApplicationGraph, EdgeKind, NodeId};

/// Type-level dependency graph over the given edge kinds.
///
/// Member endpoints are lifted to their declaring type and the resulting
/// self-references are dropped. DERIVED edges are skipped unless
/// `include_transitive` is set. Every type node is present, connected or not.
pub fn project_type_graph(
    graph: &ApplicationGraph,
    kinds: &[EdgeKind],
    config: &CycleDetectionConfig,
) -> DirectedGraph<NodeId> {
    project_type_graph_where(graph, kinds, config, |_| true)
}

/// Like [`project_type_graph`], restricted to types accepted by `include`
pub fn project_type_graph_where<F>(
    graph: &ApplicationGraph,
    kinds: &[EdgeKind],
    config: &CycleDetectionConfig,
    include: F,
) -> DirectedGraph<NodeId>
where
    F: Fn(&NodeId) -> bool,
{
    let mut projected = DirectedGraph::new();
    for node in graph.type_nodes() {
        if include(&node.id) {
            projected.add_node(node.id.clone());
        }
    }

    for edge in graph.all_edges() {
        if !kinds.contains(&edge.kind) || (edge.is_derived() && !config.include_transitive) {
            continue;
        }
        let (Some(from), Some(to)) = (owning_type(graph, &edge.from), owning_type(graph, &edge.to))
        else {
            continue;
        };
        if from != to && include(from) && include(to) {
            projected.add_edge(from.clone(), to.clone());
        }
    }
    projected
}

fn owning_type<'g>(graph: &'g ApplicationGraph, id: &'g NodeId) -> Option<&'g NodeId> {
    let node = graph.node(id)?;
    match node.declaring_type() {
        Some(owner) => Some(owner),
        None => Some(node.id()),
    }
}

/// Type edge that caused a package dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Witness {
    pub from: NodeId,
    pub to: NodeId,
}

/// Package dependency graph with the type edges behind each dependency
#[derive(Debug, Clone)]
pub struct PackageGraph {
    pub graph: DirectedGraph<String>,
    pub witnesses: BTreeMap<(String, String), Vec<Witness>>,
    /// Set when some package edge had more witnesses than were recorded
    pub witnesses_truncated: bool,
}

impl PackageGraph {
    pub fn witnesses_for(&self, from: &str, to: &str) -> &[Witness] {
        self.witnesses
            .get(&(from.to_string(), to.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Lift a type graph to packages, keeping up to
/// `max_dependencies_per_edge` witnesses per package pair
pub fn project_package_graph(
    graph: &ApplicationGraph,
    types: &DirectedGraph<NodeId>,
    config: &CycleDetectionConfig,
) -> PackageGraph {
    let package = |id: &NodeId| graph.node(id).map(|node| node.package().to_string());

    let mut projected = DirectedGraph::new();
    let mut witnesses: BTreeMap<(String, String), Vec<Witness>> = BTreeMap::new();
    let mut witnesses_truncated = false;

    for id in types.nodes() {
        if let Some(pkg) = package(id) {
            projected.add_node(pkg);
        }
    }

    for (from, to) in types.edges() {
        let (Some(from_pkg), Some(to_pkg)) = (package(from), package(to)) else {
            continue;
        };
        if from_pkg == to_pkg {
            continue;
        }
        projected.add_edge(from_pkg.clone(), to_pkg.clone());

        let recorded = witnesses.entry((from_pkg, to_pkg)).or_default();
        if recorded.len() < config.max_dependencies_per_edge {
            recorded.push(Witness {
                from: from.clone(),
                to: to.clone(),
            });
        } else {
            witnesses_truncated = true;
        }
    }

    PackageGraph {
        graph: projected,
        witnesses,
        witnesses_truncated,
    }
}
