use serde::Serialize;
use std::collections::HashSet;
use std::hash::Hash;

use super::graph::DirectedGraph;
use crate::config::CycleDetectionConfig;
use crate::observability::{get_current_context, set_phase, AnalysisPhase};

/// Cycles found by [`CycleDetector::find_cycles`].
///
/// Each cycle is closed: its first and last elements are the same node.
/// `truncated` is set when enumeration stopped at `max_cycles` while more
/// cycles remained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport<N> {
    pub cycles: Vec<Vec<N>>,
    pub truncated: bool,
}

impl<N> CycleReport<N> {
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }
}

/// Depth-first cycle enumeration bounded by [`CycleDetectionConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleDetector {
    config: CycleDetectionConfig,
}

struct Search<'a, N> {
    graph: &'a DirectedGraph<N>,
    limit: usize,
    first_only: bool,
    visited: HashSet<&'a N>,
    rec_stack: HashSet<&'a N>,
    path: Vec<&'a N>,
    cycles: Vec<Vec<N>>,
    truncated: bool,
}

impl CycleDetector {
    pub fn new(config: CycleDetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CycleDetectionConfig {
        &self.config
    }

    /// Enumerate cycles reachable through back edges, in node insertion order
    pub fn find_cycles<N>(&self, graph: &DirectedGraph<N>) -> CycleReport<N>
    where
        N: Clone + Eq + Hash,
    {
        let _phase = set_phase(AnalysisPhase::CycleDetection);
        let report = search(graph, self.config.max_cycles, false);
        if report.truncated {
            log::warn!(
                "Cycle detection stopped after {} cycles over {} nodes ({})",
                report.cycles.len(),
                graph.node_count(),
                get_current_context()
            );
        }
        report
    }

    /// Stops at the first cycle found
    pub fn has_cycles<N>(&self, graph: &DirectedGraph<N>) -> bool
    where
        N: Clone + Eq + Hash,
    {
        !search(graph, 1, true).cycles.is_empty()
    }
}

fn search<N: Clone + Eq + Hash>(
    graph: &DirectedGraph<N>,
    limit: usize,
    first_only: bool,
) -> CycleReport<N> {
    let mut state = Search {
        graph,
        limit,
        first_only,
        visited: HashSet::new(),
        rec_stack: HashSet::new(),
        path: Vec::new(),
        cycles: Vec::new(),
        truncated: false,
    };

    for node in graph.nodes() {
        if state.halted() {
            break;
        }
        if !state.visited.contains(node) {
            state.visit(node);
        }
    }

    CycleReport {
        cycles: state.cycles,
        truncated: state.truncated,
    }
}

impl<'a, N: Clone + Eq + Hash> Search<'a, N> {
    fn halted(&self) -> bool {
        self.truncated || (self.first_only && !self.cycles.is_empty())
    }

    fn visit(&mut self, node: &'a N) {
        self.visited.insert(node);
        self.rec_stack.insert(node);
        self.path.push(node);

        let graph = self.graph;
        for neighbor in graph.successors(node) {
            if self.halted() {
                break;
            }
            if !self.visited.contains(neighbor) {
                self.visit(neighbor);
            } else if self.rec_stack.contains(neighbor) {
                self.record(neighbor);
            }
        }

        self.path.pop();
        self.rec_stack.remove(node);
    }

    fn record(&mut self, closing: &'a N) {
        let Some(start) = self.path.iter().position(|n| *n == closing) else {
            return;
        };
        if self.cycles.len() >= self.limit {
            self.truncated = true;
            return;
        }
        let mut cycle: Vec<N> = self.path[start..].iter().map(|n| (*n).clone()).collect();
        cycle.push(closing.clone());
        self.cycles.push(cycle);
    }
}
