//! Strongly connected components.
//!
//! Tarjan's algorithm runs on an explicit call stack so deep dependency
//! chains cannot overflow the thread stack.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::graph::DirectedGraph;

struct TarjanFrame<'a, N> {
    node: &'a N,
    neighbors: std::slice::Iter<'a, N>,
    parent: Option<&'a N>,
}

/// Components of two or more mutually reachable nodes.
///
/// Members are listed in node insertion order. A node with a self-loop
/// but no partner is not reported.
pub fn find_strongly_connected_components<N>(graph: &DirectedGraph<N>) -> Vec<Vec<N>>
where
    N: Clone + Eq + Hash,
{
    all_components(graph)
        .into_iter()
        .filter(|component| component.len() >= 2)
        .collect()
}

/// Map every node to the representative of its component.
///
/// The representative is the component member inserted first; nodes
/// outside any multi-node component map to themselves.
pub fn compute_scc_mapping<N>(graph: &DirectedGraph<N>) -> HashMap<N, N>
where
    N: Clone + Eq + Hash,
{
    let mut mapping = HashMap::with_capacity(graph.node_count());
    for component in all_components(graph) {
        let Some(representative) = component.first().cloned() else {
            continue;
        };
        for member in component {
            mapping.insert(member, representative.clone());
        }
    }
    mapping
}

/// Number of edges on the longest path once every component is
/// contracted into a single node
pub fn condensation_longest_chain<N>(graph: &DirectedGraph<N>) -> usize
where
    N: Clone + Eq + Hash,
{
    let (dag, _) = build_condensation(graph);
    let order = match toposort(&dag, None) {
        Ok(order) => order,
        Err(cycle) => {
            log::warn!("Condensation is not acyclic at {:?}", cycle.node_id());
            return 0;
        }
    };

    let mut longest: HashMap<NodeIndex, usize> = HashMap::new();
    let mut best = 0;
    for node in order {
        let depth = longest.get(&node).copied().unwrap_or(0);
        best = best.max(depth);
        for successor in dag.neighbors(node) {
            let entry = longest.entry(successor).or_insert(0);
            *entry = (*entry).max(depth + 1);
        }
    }
    best
}

/// Contract components into a petgraph DAG keyed by representative
fn build_condensation<N>(graph: &DirectedGraph<N>) -> (DiGraph<N, ()>, HashMap<N, NodeIndex>)
where
    N: Clone + Eq + Hash,
{
    let mapping = compute_scc_mapping(graph);
    let mut dag = DiGraph::new();
    let mut node_map: HashMap<N, NodeIndex> = HashMap::new();

    for node in graph.nodes() {
        let representative = mapping.get(node).unwrap_or(node);
        if !node_map.contains_key(representative) {
            let index = dag.add_node(representative.clone());
            node_map.insert(representative.clone(), index);
        }
    }

    let mut seen = HashSet::new();
    for (from, to) in graph.edges() {
        let from = mapping.get(from).unwrap_or(from);
        let to = mapping.get(to).unwrap_or(to);
        if from == to {
            continue;
        }
        if let (Some(&a), Some(&b)) = (node_map.get(from), node_map.get(to)) {
            if seen.insert((a, b)) {
                dag.add_edge(a, b, ());
            }
        }
    }

    (dag, node_map)
}

fn all_components<N>(graph: &DirectedGraph<N>) -> Vec<Vec<N>>
where
    N: Clone + Eq + Hash,
{
    let position: HashMap<&N, usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| (node, i))
        .collect();

    let mut index: HashMap<&N, usize> = HashMap::new();
    let mut lowlink: HashMap<&N, usize> = HashMap::new();
    let mut on_stack: HashSet<&N> = HashSet::new();
    let mut tarjan_stack: Vec<&N> = Vec::new();
    let mut call_stack: Vec<TarjanFrame<'_, N>> = Vec::new();
    let mut components = Vec::new();
    let mut counter = 0usize;

    for root in graph.nodes() {
        if index.contains_key(root) {
            continue;
        }
        index.insert(root, counter);
        lowlink.insert(root, counter);
        counter += 1;
        on_stack.insert(root);
        tarjan_stack.push(root);
        call_stack.push(TarjanFrame {
            node: root,
            neighbors: graph.successors(root).iter(),
            parent: None,
        });

        while let Some(frame) = call_stack.last_mut() {
            let current = frame.node;
            match frame.neighbors.next() {
                Some(neighbor) if !index.contains_key(neighbor) => {
                    index.insert(neighbor, counter);
                    lowlink.insert(neighbor, counter);
                    counter += 1;
                    on_stack.insert(neighbor);
                    tarjan_stack.push(neighbor);
                    call_stack.push(TarjanFrame {
                        node: neighbor,
                        neighbors: graph.successors(neighbor).iter(),
                        parent: Some(current),
                    });
                }
                Some(neighbor) => {
                    if on_stack.contains(neighbor) {
                        let low = lowlink[&current].min(index[&neighbor]);
                        lowlink.insert(current, low);
                    }
                }
                None => {
                    let parent = frame.parent;
                    call_stack.pop();

                    if lowlink[&current] == index[&current] {
                        let mut component = Vec::new();
                        while let Some(member) = tarjan_stack.pop() {
                            on_stack.remove(member);
                            component.push(member.clone());
                            if member == current {
                                break;
                            }
                        }
                        component.sort_by_key(|member| position.get(member).copied());
                        components.push(component);
                    }

                    if let Some(parent) = parent {
                        let low = lowlink[&parent].min(lowlink[&current]);
                        lowlink.insert(parent, low);
                    }
                }
            }
        }
    }

    components
}
