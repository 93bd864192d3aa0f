//! Hexagonal architecture constraints: ports and layers.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::layers::{Layer, LayerClassifier};
use super::{ConstraintValidator, Severity, Violation};
use crate::classification::anchors::{is_infrastructure_type, is_test_code};
use crate::classification::{AnchorContext, ClassificationResult, ClassificationResults, PortDirection};
use crate::graph::{ApplicationGraph, GraphQuery, NodeId, TypeNode};

const PORT_DEPENDENCY: &str = "hexagonal:port-dependency";
const PORT_DIRECTION: &str = "hexagonal:port-direction";
const PORT_COVERAGE: &str = "hexagonal:port-coverage";
const LAYERING: &str = "hexagonal:layering";

fn ports_with_direction<'r, 'g>(
    classification: &'r ClassificationResults,
    query: &GraphQuery<'g>,
    direction: PortDirection,
) -> Vec<&'g TypeNode> {
    classification
        .port_classifications()
        .into_iter()
        .filter(|r: &&ClassificationResult| r.port_direction == Some(direction))
        .filter_map(|r| query.type_node(&r.node_id))
        .collect()
}

fn joined_names(types: &[&TypeNode]) -> String {
    types
        .iter()
        .map(|t| t.simple_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Driven ports must speak in domain terms, not infrastructure types
#[derive(Debug, Clone)]
pub struct PortDependencyValidator {
    anchors: Arc<AnchorContext>,
}

impl PortDependencyValidator {
    pub fn new(anchors: Arc<AnchorContext>) -> Self {
        Self { anchors }
    }
}

impl ConstraintValidator for PortDependencyValidator {
    fn constraint_id(&self) -> &str {
        PORT_DEPENDENCY
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        graph: &ApplicationGraph,
        classification: &ClassificationResults,
        query: &GraphQuery<'_>,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();

        for port in ports_with_direction(classification, query, PortDirection::Driven) {
            let offenders: BTreeSet<&str> = query
                .methods_of(&port.id)
                .into_iter()
                .flat_map(|m| m.signature_types())
                .flat_map(|t| t.all_names())
                .filter(|name| {
                    is_infrastructure_type(name) || self.anchors.is_infra_anchor(&NodeId::for_type(name))
                })
                .collect();
            if offenders.is_empty() {
                continue;
            }

            let mut nodes = vec![port.id.clone()];
            nodes.extend(
                offenders
                    .iter()
                    .map(|name| NodeId::for_type(name))
                    .filter(|id| graph.contains(id)),
            );
            violations.push(Violation::new(
                PORT_DEPENDENCY,
                self.default_severity(),
                format!(
                    "Driven port '{}' depends on infrastructure type(s): {}",
                    port.simple_name,
                    offenders.into_iter().collect::<Vec<_>>().join(", ")
                ),
                nodes,
            ));
        }
        violations
    }
}

fn core_classes<'g>(anchors: &AnchorContext, types: Vec<&'g TypeNode>) -> Vec<&'g TypeNode> {
    types
        .into_iter()
        .filter(|t| anchors.is_core_app_class(&t.id))
        .collect()
}

/// Driving ports are implemented by the core; driven ports are consumed by it
#[derive(Debug, Clone)]
pub struct PortDirectionValidator {
    anchors: Arc<AnchorContext>,
}

impl PortDirectionValidator {
    pub fn new(anchors: Arc<AnchorContext>) -> Self {
        Self { anchors }
    }
}

impl ConstraintValidator for PortDirectionValidator {
    fn constraint_id(&self) -> &str {
        PORT_DIRECTION
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        _graph: &ApplicationGraph,
        classification: &ClassificationResults,
        query: &GraphQuery<'_>,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();

        for port in ports_with_direction(classification, query, PortDirection::Driving) {
            let consumers = core_classes(&self.anchors, query.types_injecting(&port.id));
            if consumers.is_empty() {
                continue;
            }
            let mut nodes = vec![port.id.clone()];
            nodes.extend(consumers.iter().map(|t| t.id.clone()));
            violations.push(Violation::new(
                PORT_DIRECTION,
                self.default_severity(),
                format!(
                    "Driving port '{}' is consumed by core class(es): {}",
                    port.simple_name,
                    joined_names(&consumers)
                ),
                nodes,
            ));
        }

        for port in ports_with_direction(classification, query, PortDirection::Driven) {
            let implementors = core_classes(&self.anchors, query.implementors_of(&port.id));
            if implementors.is_empty() {
                continue;
            }
            let mut nodes = vec![port.id.clone()];
            nodes.extend(implementors.iter().map(|t| t.id.clone()));
            violations.push(Violation::new(
                PORT_DIRECTION,
                self.default_severity(),
                format!(
                    "Driven port '{}' is implemented by core class(es): {}",
                    port.simple_name,
                    joined_names(&implementors)
                ),
                nodes,
            ));
        }
        violations
    }
}

/// Every driven port needs a production adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct PortCoverageValidator;

impl ConstraintValidator for PortCoverageValidator {
    fn constraint_id(&self) -> &str {
        PORT_COVERAGE
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        _graph: &ApplicationGraph,
        classification: &ClassificationResults,
        query: &GraphQuery<'_>,
    ) -> Vec<Violation> {
        ports_with_direction(classification, query, PortDirection::Driven)
            .into_iter()
            .filter(|port| {
                query
                    .implementors_of(&port.id)
                    .into_iter()
                    .all(is_test_code)
            })
            .map(|port| {
                Violation::new(
                    PORT_COVERAGE,
                    self.default_severity(),
                    format!("Driven port '{}' has no production implementation", port.simple_name),
                    vec![port.id.clone()],
                )
            })
            .collect()
    }
}

/// Application-layer types must not depend on presentation-layer types
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeringValidator {
    layers: LayerClassifier,
}

impl ConstraintValidator for LayeringValidator {
    fn constraint_id(&self) -> &str {
        LAYERING
    }

    fn default_severity(&self) -> Severity {
        Severity::Critical
    }

    fn validate(
        &self,
        _graph: &ApplicationGraph,
        _classification: &ClassificationResults,
        query: &GraphQuery<'_>,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        for node in query.types() {
            if self.layers.classify(node) != Layer::Application {
                continue;
            }
            let presentation: Vec<&TypeNode> = query
                .dependencies_of_type(&node.id)
                .iter()
                .filter_map(|id| query.type_node(id))
                .filter(|dep| self.layers.classify(dep) == Layer::Presentation)
                .collect();
            if presentation.is_empty() {
                continue;
            }

            let mut nodes = vec![node.id.clone()];
            nodes.extend(presentation.iter().map(|t| t.id.clone()));
            violations.push(Violation::new(
                LAYERING,
                self.default_severity(),
                format!(
                    "Application type '{}' depends on presentation type(s): {}",
                    node.simple_name,
                    joined_names(&presentation)
                ),
                nodes,
            ));
        }
        violations
    }
}
