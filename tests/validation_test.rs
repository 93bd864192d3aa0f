mod common;

use archlens::config::{ArchlensConfig, AuditConfig};
use archlens::graph::{ApplicationGraph, NodeId, TypeForm, TypeRef};
use archlens::semantic::{SourceField, SourceMethod, SourceType};
use archlens::validation::{default_validators, run_validators, Severity, Violation};
use archlens::classification::AnchorContext;
use archlens::ClassificationResults;
use std::sync::Arc;
use common::{build, classify_with, field};
use pretty_assertions::assert_eq;

const EXPLICIT: &[(&str, &str)] = &[
    ("shop.domain.Order", "AGGREGATE_ROOT"),
    ("shop.domain.Customer", "AGGREGATE_ROOT"),
    ("shop.domain.Money", "VALUE_OBJECT"),
];

/// Two aggregates in a cycle through an owned type, a mutable value
/// object and a persistence annotation on an aggregate
fn flawed_domain() -> (ApplicationGraph, ClassificationResults) {
    let graph = build(vec![
        SourceType::new("shop.domain.Order", TypeForm::Class)
            .annotated("jakarta.persistence.Entity")
            .with_field(field("customer", "shop.domain.Customer"))
            .with_field(field("total", "shop.domain.Money")),
        SourceType::new("shop.domain.Customer", TypeForm::Class)
            .with_field(field("wallet", "shop.domain.Wallet")),
        SourceType::new("shop.domain.Wallet", TypeForm::Class)
            .with_field(field("pending", "shop.domain.Order")),
        SourceType::new("shop.domain.Money", TypeForm::Class)
            .with_field(SourceField::new("amount", TypeRef::new("java.math.BigDecimal")))
            .with_method(
                SourceMethod::new("setAmount", TypeRef::void())
                    .with_parameter("amount", TypeRef::new("java.math.BigDecimal")),
            ),
    ]);
    let results = classify_with(&graph, EXPLICIT);
    (graph, results)
}

fn audit(config: &AuditConfig) -> Vec<Violation> {
    let (graph, results) = flawed_domain();
    let validators = default_validators(
        &ArchlensConfig {
            audit: config.clone(),
            ..ArchlensConfig::default()
        },
        Arc::new(AnchorContext::analyze(&graph)),
    );
    run_validators(&validators, &graph, &results, config)
}

#[test]
fn test_default_validators_report_in_registration_order() {
    let violations = audit(&AuditConfig::default());
    let ids: Vec<&str> = violations.iter().map(|v| v.constraint_id.as_str()).collect();

    assert_eq!(
        ids,
        vec!["ddd:aggregate-cycle", "ddd:value-object-immutable", "ddd:domain-purity"]
    );
}

#[test]
fn test_violation_messages_and_nodes() {
    let violations = audit(&AuditConfig::default());

    assert_eq!(
        violations[0].message,
        "Aggregates reference each other in a cycle: Order -> Customer -> Order"
    );
    assert_eq!(violations[0].severity, Severity::Critical);
    assert_eq!(
        violations[0].nodes,
        vec![
            NodeId::for_type("shop.domain.Order"),
            NodeId::for_type("shop.domain.Customer"),
        ]
    );

    assert_eq!(
        violations[1].message,
        "Value object 'Money' is mutable: amount, setAmount"
    );
    assert_eq!(
        violations[2].message,
        "Domain type 'Order' references 1 forbidden type(s): jakarta.persistence.Entity"
    );
}

#[test]
fn test_disabled_and_overridden_constraints() {
    let mut config = AuditConfig {
        disabled: vec!["ddd:domain-purity".to_string()],
        ..AuditConfig::default()
    };
    config
        .severity_overrides
        .insert("ddd:value-object-immutable".to_string(), Severity::Minor);

    let violations = audit(&config);
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[1].severity, Severity::Minor);
    assert!(violations.iter().all(|v| v.constraint_id != "ddd:domain-purity"));
}

#[test]
fn test_validators_leave_inputs_untouched() {
    let (graph, results) = flawed_domain();
    let edges_before = graph.edge_count();
    let before: Vec<_> = results.iter().cloned().collect();

    let validators = default_validators(
        &ArchlensConfig::default(),
        Arc::new(AnchorContext::analyze(&graph)),
    );
    let first = run_validators(&validators, &graph, &results, &AuditConfig::default());
    let second = run_validators(&validators, &graph, &results, &AuditConfig::default());

    assert_eq!(first, second);
    assert_eq!(graph.edge_count(), edges_before);
    assert_eq!(results.iter().cloned().collect::<Vec<_>>(), before);
}

#[test]
fn test_violation_display() {
    let violation = Violation::new(
        "hexagonal:layering",
        Severity::Critical,
        "Application type 'Handler' depends on presentation type(s): Controller",
        vec![],
    );
    assert_eq!(
        violation.to_string(),
        "[CRITICAL] hexagonal:layering: Application type 'Handler' depends on presentation type(s): Controller"
    );
}
