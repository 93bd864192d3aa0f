use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Plain directed graph used for cycle and SCC detection.
///
/// Nodes and successor lists keep insertion order so every traversal is
/// deterministic. Adding an edge adds its endpoints; duplicate edges are
/// ignored.
#[derive(Debug, Clone)]
pub struct DirectedGraph<N> {
    nodes: Vec<N>,
    adjacency: HashMap<N, Vec<N>>,
    edges: HashSet<(N, N)>,
}

impl<N: Clone + Eq + Hash> Default for DirectedGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone + Eq + Hash> DirectedGraph<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            adjacency: HashMap::new(),
            edges: HashSet::new(),
        }
    }

    /// Build from `(from, to)` pairs
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    pub fn add_node(&mut self, node: N) {
        if !self.adjacency.contains_key(&node) {
            self.adjacency.insert(node.clone(), Vec::new());
            self.nodes.push(node);
        }
    }

    pub fn add_edge(&mut self, from: N, to: N) {
        self.add_node(from.clone());
        self.add_node(to.clone());
        if self.edges.insert((from.clone(), to.clone())) {
            if let Some(successors) = self.adjacency.get_mut(&from) {
                successors.push(to);
            }
        }
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn successors(&self, node: &N) -> &[N] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors(&self, node: &N) -> Vec<&N> {
        self.nodes
            .iter()
            .filter(|candidate| self.successors(candidate).contains(node))
            .collect()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn has_edge(&self, from: &N, to: &N) -> bool {
        self.edges.contains(&(from.clone(), to.clone()))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges in node order, then successor order
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> {
        self.nodes
            .iter()
            .flat_map(move |from| self.successors(from).iter().map(move |to| (from, to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_add_endpoints_once() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        graph.add_node("a");

        assert_eq!(graph.nodes(), &["a", "b", "c"]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.successors(&"a"), &["b"]);
        assert!(graph.successors(&"missing").is_empty());
    }

    #[test]
    fn test_predecessors_and_edge_order() {
        let graph = DirectedGraph::from_edges([("a", "c"), ("b", "c"), ("a", "b")]);

        assert_eq!(graph.predecessors(&"c"), vec![&"a", &"b"]);
        assert!(graph.has_edge(&"a", &"b"));
        assert!(!graph.has_edge(&"b", &"a"));
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![(&"a", &"c"), (&"a", &"b"), (&"b", &"c")]);
    }
}
