use std::collections::HashMap;

use super::indexes::GraphIndexes;
use super::model::{Edge, EdgeKind, GraphMetadata, Node, NodeId, TypeNode};
use super::query::GraphQuery;
use crate::errors::{Error, Result};

/// Append-only store of all nodes and edges for one analysis run.
///
/// Nodes are kept in an insertion-ordered arena addressed through a
/// `NodeId -> position` map. Edges are an insertion-ordered list with
/// per-node adjacency positions. The only mutators are [`add_node`] and
/// [`add_edge`]; there is no removal or update, which makes a finished
/// graph safe to share read-only across threads.
///
/// [`add_node`]: ApplicationGraph::add_node
/// [`add_edge`]: ApplicationGraph::add_edge
#[derive(Debug, Clone, Default)]
pub struct ApplicationGraph {
    metadata: GraphMetadata,
    nodes: Vec<Node>,
    positions: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    outgoing: HashMap<NodeId, Vec<usize>>,
    incoming: HashMap<NodeId, Vec<usize>>,
    by_kind: HashMap<EdgeKind, Vec<usize>>,
    indexes: GraphIndexes,
}

impl ApplicationGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(metadata: GraphMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// Add a node, failing if a node with the same id already exists
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.positions.contains_key(node.id()) {
            return Err(Error::duplicate_node(node.id().clone()));
        }

        self.indexes.on_node_added(&node);
        self.positions.insert(node.id().clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Add an edge, failing if either endpoint is not already a node
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        for endpoint in [&edge.from, &edge.to] {
            if !self.positions.contains_key(endpoint) {
                return Err(Error::dangling_edge(
                    edge.from.clone(),
                    edge.to.clone(),
                    edge.kind,
                    endpoint.clone(),
                ));
            }
        }

        let position = self.edges.len();
        self.indexes.on_edge_added(&edge);
        self.outgoing
            .entry(edge.from.clone())
            .or_default()
            .push(position);
        self.incoming
            .entry(edge.to.clone())
            .or_default()
            .push(position);
        self.by_kind.entry(edge.kind).or_default().push(position);
        self.edges.push(edge);
        Ok(())
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.positions.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.positions.get(id).map(|&position| &self.nodes[position])
    }

    pub fn type_node(&self, id: &NodeId) -> Option<&TypeNode> {
        self.node(id).and_then(Node::as_type)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// All type nodes in insertion order
    pub fn type_nodes(&self) -> impl Iterator<Item = &TypeNode> {
        self.indexes
            .all_types()
            .iter()
            .filter_map(|id| self.type_node(id))
    }

    /// All edges in insertion order
    pub fn all_edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_from<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges_at(self.outgoing.get(id))
    }

    pub fn edges_to<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges_at(self.incoming.get(id))
    }

    pub fn edges(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges_at(self.by_kind.get(&kind))
    }

    fn edges_at<'a>(
        &'a self,
        positions: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        positions
            .into_iter()
            .flatten()
            .map(move |&position| &self.edges[position])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn type_count(&self) -> usize {
        self.indexes.all_types().len()
    }

    pub fn member_count(&self) -> usize {
        self.indexes.all_members().len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn indexes(&self) -> &GraphIndexes {
        &self.indexes
    }

    /// Read-only query facade over this graph
    pub fn query(&self) -> GraphQuery<'_> {
        GraphQuery::new(self)
    }
}
