mod common;

use archlens::config::CycleDetectionConfig;
use archlens::cycles::{
    compute_scc_mapping, condensation_longest_chain, find_strongly_connected_components,
    project_package_graph, project_type_graph, CycleDetector, DirectedGraph,
};
use archlens::graph::{EdgeKind, NodeId, TypeForm, TypeRef};
use archlens::semantic::{SourceMethod, SourceType};
use common::{build, field};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn triangle() -> DirectedGraph<&'static str> {
    DirectedGraph::from_edges([("A", "B"), ("B", "C"), ("C", "A")])
}

#[test]
fn test_three_cycle_is_found_once() {
    let report = CycleDetector::new(CycleDetectionConfig::default()).find_cycles(&triangle());

    assert_eq!(report.cycles, vec![vec!["A", "B", "C", "A"]]);
    assert!(!report.truncated);
}

#[test]
fn test_three_cycle_is_one_component() {
    let mut graph = triangle();
    graph.add_node("D");

    assert_eq!(find_strongly_connected_components(&graph), vec![vec!["A", "B", "C"]]);

    let mapping = compute_scc_mapping(&graph);
    assert_eq!(mapping.len(), 4);
    assert_eq!(mapping["B"], "A");
    assert_eq!(mapping["C"], "A");
    assert_eq!(mapping["D"], "D");
}

#[test]
fn test_enumeration_stops_at_max_cycles() {
    let graph = DirectedGraph::from_edges([
        ("A", "B"),
        ("B", "A"),
        ("C", "D"),
        ("D", "C"),
        ("E", "F"),
        ("F", "E"),
    ]);
    let report =
        CycleDetector::new(CycleDetectionConfig::default().with_max_cycles(2)).find_cycles(&graph);

    assert_eq!(report.len(), 2);
    assert!(report.truncated);
}

#[test]
fn test_dense_graph_is_bounded() {
    let mut graph = DirectedGraph::new();
    for i in 0..12u32 {
        for j in 0..12u32 {
            if i != j {
                graph.add_edge(i, j);
            }
        }
    }
    let report =
        CycleDetector::new(CycleDetectionConfig::default().with_max_cycles(10)).find_cycles(&graph);

    assert_eq!(report.len(), 10);
    assert!(report.truncated);
    assert_eq!(find_strongly_connected_components(&graph).len(), 1);
}

#[test]
fn test_longest_chain_contracts_cycles() {
    let graph = DirectedGraph::from_edges([("A", "B"), ("B", "C"), ("C", "B"), ("C", "D")]);
    assert_eq!(condensation_longest_chain(&graph), 2);
}

#[test]
fn test_type_projection_lifts_member_edges() {
    let graph = build(vec![
        SourceType::new("shop.order.Order", TypeForm::Class)
            .with_field(field("customer", "shop.customer.Customer")),
        SourceType::new("shop.customer.Customer", TypeForm::Class)
            .with_method(SourceMethod::new("lastOrder", TypeRef::new("shop.order.Order"))),
        SourceType::new("shop.catalog.Product", TypeForm::Class),
    ]);
    let config = CycleDetectionConfig::default();
    let types = project_type_graph(
        &graph,
        &[EdgeKind::FieldType, EdgeKind::ReturnType],
        &config,
    );

    assert_eq!(types.node_count(), 3);
    assert!(types.has_edge(
        &NodeId::for_type("shop.order.Order"),
        &NodeId::for_type("shop.customer.Customer")
    ));
    let report = CycleDetector::new(config).find_cycles(&types);
    assert_eq!(report.len(), 1);
    assert_eq!(report.cycles[0].len(), 3);
}

#[test]
fn test_derived_edges_follow_include_transitive() {
    let graph = build(vec![
        SourceType::new("shop.OrderRepository", TypeForm::Interface)
            .with_method(SourceMethod::new("load", TypeRef::new("shop.Order"))),
        SourceType::new("shop.Order", TypeForm::Class),
    ]);
    let kinds = [EdgeKind::UsesInSignature];

    let with = project_type_graph(&graph, &kinds, &CycleDetectionConfig::default());
    let without = project_type_graph(
        &graph,
        &kinds,
        &CycleDetectionConfig::default().with_include_transitive(false),
    );

    assert_eq!(with.edge_count(), 1);
    assert_eq!(without.edge_count(), 0);
}

#[test]
fn test_package_witnesses_are_capped() {
    let graph = build(vec![
        SourceType::new("shop.a.First", TypeForm::Class).with_field(field("b", "shop.b.Target")),
        SourceType::new("shop.a.Second", TypeForm::Class).with_field(field("b", "shop.b.Target")),
        SourceType::new("shop.b.Target", TypeForm::Class),
    ]);
    let config = CycleDetectionConfig::default().with_max_dependencies_per_edge(1);
    let types = project_type_graph(&graph, &[EdgeKind::FieldType], &config);
    let packages = project_package_graph(&graph, &types, &config);

    assert_eq!(packages.graph.edge_count(), 1);
    assert_eq!(packages.witnesses_for("shop.a", "shop.b").len(), 1);
    assert!(packages.witnesses_truncated);
}

proptest! {
    #[test]
    fn prop_scc_mapping_is_total_and_idempotent(
        edges in prop::collection::vec((0u8..20, 0u8..20), 0..60)
    ) {
        let graph = DirectedGraph::from_edges(edges);
        let mapping = compute_scc_mapping(&graph);

        prop_assert_eq!(mapping.len(), graph.node_count());
        for node in graph.nodes() {
            let rep = &mapping[node];
            prop_assert_eq!(&mapping[rep], rep);
        }
        for component in find_strongly_connected_components(&graph) {
            prop_assert!(component.len() >= 2);
            let rep = &mapping[&component[0]];
            prop_assert!(component.iter().all(|n| &mapping[n] == rep));
        }
    }

    #[test]
    fn prop_report_never_exceeds_max_cycles(
        edges in prop::collection::vec((0u8..8, 0u8..8), 0..30),
        max in 1usize..5
    ) {
        let graph = DirectedGraph::from_edges(edges);
        let report = CycleDetector::new(CycleDetectionConfig::default().with_max_cycles(max))
            .find_cycles(&graph);

        prop_assert!(report.len() <= max);
        for cycle in &report.cycles {
            prop_assert_eq!(cycle.first(), cycle.last());
        }
    }
}
