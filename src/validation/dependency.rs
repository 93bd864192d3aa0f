use std::collections::HashSet;

use super::{ConstraintValidator, Severity, Violation};
use crate::classification::ClassificationResults;
use crate::config::CycleDetectionConfig;
use crate::cycles::{find_strongly_connected_components, project_package_graph, project_type_graph};
use crate::graph::{ApplicationGraph, EdgeKind, GraphQuery, NodeId};

const PACKAGE_CYCLES: &str = "dependency:package-cycles";

const DEPENDENCY_KINDS: &[EdgeKind] = &[
    EdgeKind::Extends,
    EdgeKind::Implements,
    EdgeKind::FieldType,
    EdgeKind::ReturnType,
    EdgeKind::ParameterType,
    EdgeKind::UsesInSignature,
];

/// Packages must not depend on each other cyclically
#[derive(Debug, Clone, Default)]
pub struct PackageCycleValidator {
    config: CycleDetectionConfig,
}

impl PackageCycleValidator {
    pub fn new(config: CycleDetectionConfig) -> Self {
        Self { config }
    }
}

impl ConstraintValidator for PackageCycleValidator {
    fn constraint_id(&self) -> &str {
        PACKAGE_CYCLES
    }

    fn default_severity(&self) -> Severity {
        Severity::Major
    }

    fn validate(
        &self,
        graph: &ApplicationGraph,
        _classification: &ClassificationResults,
        _query: &GraphQuery<'_>,
    ) -> Vec<Violation> {
        let types = project_type_graph(graph, DEPENDENCY_KINDS, &self.config);
        let packages = project_package_graph(graph, &types, &self.config);

        find_strongly_connected_components(&packages.graph)
            .into_iter()
            .map(|component| {
                let members: HashSet<&String> = component.iter().collect();
                let mut seen = HashSet::new();
                let mut nodes: Vec<NodeId> = Vec::new();
                let mut edges = Vec::new();

                for (from, to) in packages.graph.edges() {
                    if !members.contains(from) || !members.contains(to) {
                        continue;
                    }
                    let witnesses = packages.witnesses_for(from, to);
                    if let Some(first) = witnesses.first() {
                        edges.push(format!(
                            "{from} -> {to} (via {} -> {})",
                            first.from.value(),
                            first.to.value()
                        ));
                    }
                    for witness in witnesses {
                        for id in [&witness.from, &witness.to] {
                            if seen.insert(id.clone()) {
                                nodes.push(id.clone());
                            }
                        }
                    }
                }

                let mut message = format!(
                    "Packages form a dependency cycle: {}",
                    edges.join(", ")
                );
                if packages.witnesses_truncated {
                    message.push_str(" [witnesses truncated]");
                }
                Violation::new(PACKAGE_CYCLES, self.default_severity(), message, nodes)
            })
            .collect()
    }
}
