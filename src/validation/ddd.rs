//! Domain-driven design constraints.

use std::collections::{BTreeSet, HashSet, VecDeque};

use super::{ConstraintValidator, Severity, Violation};
use crate::classification::{ClassificationResults, DomainKind, RoleKind};
use crate::config::CycleDetectionConfig;
use crate::cycles::{CycleDetector, DirectedGraph};
use crate::graph::{ApplicationGraph, GraphQuery, NodeId, TypeNode};

const AGGREGATE_CYCLE: &str = "ddd:aggregate-cycle";
const VALUE_OBJECT_IMMUTABLE: &str = "ddd:value-object-immutable";
const DOMAIN_PURITY: &str = "ddd:domain-purity";

fn simple_name<'g>(query: &GraphQuery<'g>, id: &'g NodeId) -> &'g str {
    query
        .type_node(id)
        .map(|t| t.simple_name.as_str())
        .unwrap_or(id.value())
}

/// Aggregates must not reference each other in a cycle, directly or
/// through the types they own
#[derive(Debug, Clone, Default)]
pub struct AggregateCycleValidator {
    config: CycleDetectionConfig,
}

impl AggregateCycleValidator {
    pub fn new(config: CycleDetectionConfig) -> Self {
        Self { config }
    }

    /// Aggregate -> aggregate references, following fields through
    /// non-aggregate types
    pub fn reference_graph(
        classification: &ClassificationResults,
        query: &GraphQuery<'_>,
    ) -> DirectedGraph<NodeId> {
        let aggregates: Vec<&NodeId> = classification
            .of_kind(RoleKind::Domain(DomainKind::AggregateRoot))
            .into_iter()
            .map(|r| &r.node_id)
            .collect();
        let aggregate_set: HashSet<&NodeId> = aggregates.iter().copied().collect();

        let mut graph = DirectedGraph::new();
        for aggregate in &aggregates {
            graph.add_node((*aggregate).clone());
        }
        for aggregate in aggregates {
            for target in referenced_aggregates(aggregate, &aggregate_set, query) {
                graph.add_edge(aggregate.clone(), target);
            }
        }
        graph
    }
}

fn referenced_aggregates(
    start: &NodeId,
    aggregates: &HashSet<&NodeId>,
    query: &GraphQuery<'_>,
) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(current) = queue.pop_front() {
        for field in query.fields_of(&current) {
            for name in field.field_type.all_names() {
                let target = NodeId::for_type(name);
                if !visited.insert(target.clone()) || query.type_node(&target).is_none() {
                    continue;
                }
                if aggregates.contains(&target) {
                    found.push(target);
                } else {
                    queue.push_back(target);
                }
            }
        }
    }
    found
}

impl ConstraintValidator for AggregateCycleValidator {
    fn constraint_id(&self) -> &str {
        AGGREGATE_CYCLE
    }

    fn default_severity(&self) -> Severity {
        Severity::Critical
    }

    fn validate(
        &self,
        _graph: &ApplicationGraph,
        classification: &ClassificationResults,
        query: &GraphQuery<'_>,
    ) -> Vec<Violation> {
        let references = Self::reference_graph(classification, query);
        let report = CycleDetector::new(self.config).find_cycles(&references);

        let mut seen: HashSet<BTreeSet<NodeId>> = HashSet::new();
        let mut violations = Vec::new();
        for cycle in &report.cycles {
            let members = &cycle[..cycle.len().saturating_sub(1)];
            if !seen.insert(members.iter().cloned().collect()) {
                continue;
            }
            let path: Vec<&str> = cycle.iter().map(|id| simple_name(query, id)).collect();
            violations.push(Violation::new(
                AGGREGATE_CYCLE,
                self.default_severity(),
                format!("Aggregates reference each other in a cycle: {}", path.join(" -> ")),
                members.to_vec(),
            ));
        }

        if report.truncated {
            violations.push(Violation::new(
                AGGREGATE_CYCLE,
                Severity::Info,
                format!(
                    "Cycle detection stopped after {} cycles; more aggregate cycles may exist",
                    report.cycles.len()
                ),
                Vec::new(),
            ));
        }
        violations
    }
}

/// Value objects must not expose mutable state
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueObjectImmutableValidator;

impl ConstraintValidator for ValueObjectImmutableValidator {
    fn constraint_id(&self) -> &str {
        VALUE_OBJECT_IMMUTABLE
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
        classification
            .of_kind(RoleKind::Domain(DomainKind::ValueObject))
            .into_iter()
            .filter_map(|result| query.type_node(&result.node_id))
            .filter_map(|node| self.check(node, query))
            .collect()
    }
}

impl ValueObjectImmutableValidator {
    fn check(&self, node: &TypeNode, query: &GraphQuery<'_>) -> Option<Violation> {
        let mutable_fields: Vec<_> = if node.is_record() {
            Vec::new()
        } else {
            query
                .fields_of(&node.id)
                .into_iter()
                .filter(|f| !f.is_static() && !f.is_final())
                .collect()
        };
        let setters: Vec<_> = query
            .methods_of(&node.id)
            .into_iter()
            .filter(|m| m.is_setter())
            .collect();

        if mutable_fields.is_empty() && setters.is_empty() {
            return None;
        }

        let offenders: Vec<&str> = mutable_fields
            .iter()
            .map(|f| f.simple_name.as_str())
            .chain(setters.iter().map(|m| m.simple_name.as_str()))
            .collect();
        let mut nodes = vec![node.id.clone()];
        nodes.extend(mutable_fields.iter().map(|f| f.id.clone()));
        nodes.extend(setters.iter().map(|m| m.id.clone()));

        Some(Violation::new(
            VALUE_OBJECT_IMMUTABLE,
            self.default_severity(),
            format!(
                "Value object '{}' is mutable: {}",
                node.simple_name,
                offenders.join(", ")
            ),
            nodes,
        ))
    }
}

/// Domain types must not reference framework or infrastructure packages
#[derive(Debug, Clone)]
pub struct DomainPurityValidator {
    forbidden_prefixes: Vec<String>,
}

impl DomainPurityValidator {
    pub fn new(forbidden_prefixes: Vec<String>) -> Self {
        Self { forbidden_prefixes }
    }

    fn is_forbidden(&self, name: &str) -> bool {
        self.forbidden_prefixes.iter().any(|prefix| {
            name.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
    }
}

/// Every qualified name a type mentions in its declaration and members
fn referenced_names<'g>(node: &'g TypeNode, query: &GraphQuery<'g>) -> BTreeSet<&'g str> {
    let mut names = BTreeSet::new();
    names.extend(node.annotations.iter().map(|a| a.qualified_name.as_str()));
    for type_ref in node.super_type.iter().chain(&node.interfaces) {
        names.extend(type_ref.all_names());
    }
    for field in query.fields_of(&node.id) {
        names.extend(field.field_type.all_names());
        names.extend(field.annotations.iter().map(|a| a.qualified_name.as_str()));
    }
    for method in query.methods_of(&node.id) {
        for type_ref in method.signature_types() {
            names.extend(type_ref.all_names());
        }
        names.extend(method.annotations.iter().map(|a| a.qualified_name.as_str()));
    }
    for ctor in query.constructors_of(&node.id) {
        for param in &ctor.parameters {
            names.extend(param.param_type.all_names());
        }
    }
    names
}

impl ConstraintValidator for DomainPurityValidator {
    fn constraint_id(&self) -> &str {
        DOMAIN_PURITY
    }

    fn default_severity(&self) -> Severity {
        Severity::Critical
    }

    fn validate(
        &self,
        _graph: &ApplicationGraph,
        classification: &ClassificationResults,
        query: &GraphQuery<'_>,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        for result in classification.domain_classifications() {
            let Some(node) = query.type_node(&result.node_id) else {
                continue;
            };
            let forbidden: Vec<&str> = referenced_names(node, query)
                .into_iter()
                .filter(|name| self.is_forbidden(name))
                .collect();
            if forbidden.is_empty() {
                continue;
            }
            violations.push(Violation::new(
                DOMAIN_PURITY,
                self.default_severity(),
                format!(
                    "Domain type '{}' references {} forbidden type(s): {}",
                    node.simple_name,
                    forbidden.len(),
                    forbidden.join(", ")
                ),
                vec![node.id.clone()],
            ));
        }
        violations
    }
}
