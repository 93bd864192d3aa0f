//! Cycle detection over projections of the application graph.
//!
//! [`DirectedGraph`] decouples the algorithms from graph node and edge
//! types. [`CycleDetector`] enumerates cycles with a recursive DFS bounded
//! by `max_cycles`; the SCC functions use an iterative Tarjan.

pub mod detector;
pub mod graph;
pub mod projection;
pub mod scc;

pub use detector::{CycleDetector, CycleReport};
pub use graph::DirectedGraph;
pub use projection::{
    project_package_graph, project_type_graph, project_type_graph_where, PackageGraph, Witness,
};
pub use scc::{compute_scc_mapping, condensation_longest_chain, find_strongly_connected_components};
