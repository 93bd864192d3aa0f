//! Per-interface facts deciding port direction.
//!
//! Facts are computed once after the graph is closed, then only read. Every
//! predicate is a pure function of the stored booleans.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug_span;

use super::anchors::{is_test_code, AnchorContext};
use crate::graph::{GraphQuery, NodeId, TypeNode};
use crate::observability::{set_phase, AnalysisPhase};

const PORT_ANNOTATIONS: &[&str] = &[
    "org.jmolecules.architecture.hexagonal.PrimaryPort",
    "org.jmolecules.architecture.hexagonal.SecondaryPort",
    "org.jmolecules.ddd.annotation.Repository",
];

const PORT_NAME_PATTERNS: &[&str] = &[
    "Repository",
    "Saver",
    "Fetcher",
    "Finder",
    "Loader",
    "Store",
    "Gateway",
    "Client",
    "Adapter",
    "Publisher",
    "Sender",
    "Emitter",
    "Port",
];

const EXTERNAL_PREFIXES: &[&str] = &[
    "java.",
    "javax.",
    "jakarta.",
    "org.springframework.",
    "org.hibernate.",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceFacts {
    pub interface_id: NodeId,
    pub impls_prod_count: usize,
    pub missing_impl: bool,
    pub internal_impl_only: bool,
    pub infra_impl_only: bool,
    pub used_by_core: bool,
    pub implemented_by_core: bool,
    pub has_port_annotation: bool,
}

impl InterfaceFacts {
    /// Interface implemented by core code and not consumed by it
    pub fn driving_port(interface_id: NodeId, impls_prod_count: usize, has_port_annotation: bool) -> Self {
        Self {
            interface_id,
            impls_prod_count,
            missing_impl: impls_prod_count == 0,
            internal_impl_only: false,
            infra_impl_only: false,
            used_by_core: false,
            implemented_by_core: true,
            has_port_annotation,
        }
    }

    /// Interface consumed by core code with no implementation yet
    pub fn driven_port_missing_impl(interface_id: NodeId, has_port_annotation: bool) -> Self {
        Self {
            interface_id,
            impls_prod_count: 0,
            missing_impl: true,
            internal_impl_only: false,
            infra_impl_only: false,
            used_by_core: true,
            implemented_by_core: false,
            has_port_annotation,
        }
    }

    /// Interface consumed by core code and implemented only inside the domain
    pub fn driven_port_internal_impl(
        interface_id: NodeId,
        impls_prod_count: usize,
        has_port_annotation: bool,
    ) -> Self {
        Self {
            interface_id,
            impls_prod_count,
            missing_impl: false,
            internal_impl_only: true,
            infra_impl_only: false,
            used_by_core: true,
            implemented_by_core: false,
            has_port_annotation,
        }
    }

    /// Interface implemented only by infrastructure adapters
    pub fn driven_port_infra_impl(
        interface_id: NodeId,
        impls_prod_count: usize,
        has_port_annotation: bool,
    ) -> Self {
        Self {
            interface_id,
            impls_prod_count,
            missing_impl: false,
            internal_impl_only: false,
            infra_impl_only: true,
            used_by_core: false,
            implemented_by_core: false,
            has_port_annotation,
        }
    }

    pub fn is_driving_port_candidate(&self) -> bool {
        self.implemented_by_core && !self.used_by_core
    }

    pub fn is_driven_port_candidate(&self) -> bool {
        self.is_driven_port_candidate_without_annotation_check() && self.has_port_annotation
    }

    pub fn is_driven_port_candidate_without_annotation_check(&self) -> bool {
        self.used_by_core && (self.missing_impl || self.internal_impl_only)
    }

    pub fn is_driven_port_with_external_impl(&self) -> bool {
        self.used_by_core
            && !self.implemented_by_core
            && !self.missing_impl
            && !self.internal_impl_only
    }

    pub fn is_driven_port_by_infrastructure_impl(&self) -> bool {
        self.infra_impl_only && !self.implemented_by_core
    }

    pub fn has_prod_impl(&self) -> bool {
        self.impls_prod_count > 0
    }

    pub fn is_internal_interface(&self) -> bool {
        self.has_prod_impl() && self.internal_impl_only && !self.implemented_by_core
    }

    /// Any of the driven-port shapes
    pub fn is_driven_port(&self) -> bool {
        self.is_driven_port_candidate()
            || self.is_driven_port_with_external_impl()
            || self.is_driven_port_by_infrastructure_impl()
    }

    pub fn is_undecided(&self) -> bool {
        !self.is_driving_port_candidate()
            && !self.is_driven_port_candidate()
            && !self.is_driven_port_with_external_impl()
            && !self.is_driven_port_by_infrastructure_impl()
            && !self.is_internal_interface()
    }
}

/// Facts for every non-external interface of a graph
#[derive(Debug, Clone, Default)]
pub struct InterfaceFactsIndex {
    facts: HashMap<NodeId, InterfaceFacts>,
}

impl InterfaceFactsIndex {
    pub fn build(query: &GraphQuery<'_>, anchors: &AnchorContext) -> Self {
        let _phase = set_phase(AnalysisPhase::InterfaceFacts);
        let _span = debug_span!("interface_facts").entered();

        let facts: HashMap<NodeId, InterfaceFacts> = query
            .interfaces()
            .into_iter()
            .filter(|iface| !is_external_interface(iface))
            .map(|iface| (iface.id.clone(), compute_facts(iface, query, anchors)))
            .collect();

        let index = Self { facts };
        log::debug!(
            "Interface facts: {} interfaces, {} driving, {} driven",
            index.len(),
            index.all().filter(|f| f.is_driving_port_candidate()).count(),
            index.all().filter(|f| f.is_driven_port()).count()
        );
        index
    }

    pub fn from_facts(facts: impl IntoIterator<Item = InterfaceFacts>) -> Self {
        Self {
            facts: facts
                .into_iter()
                .map(|f| (f.interface_id.clone(), f))
                .collect(),
        }
    }

    pub fn get(&self, interface: &NodeId) -> Option<&InterfaceFacts> {
        self.facts.get(interface)
    }

    pub fn all(&self) -> impl Iterator<Item = &InterfaceFacts> {
        self.facts.values()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

fn compute_facts(iface: &TypeNode, query: &GraphQuery<'_>, anchors: &AnchorContext) -> InterfaceFacts {
    let prod_impls: Vec<&TypeNode> = query
        .implementors_of(&iface.id)
        .into_iter()
        .filter(|t| !is_test_code(t))
        .collect();
    let has_impls = !prod_impls.is_empty();

    let used_by_core = query
        .types_injecting(&iface.id)
        .iter()
        .any(|t| anchors.is_core_app_class(&t.id));

    InterfaceFacts {
        interface_id: iface.id.clone(),
        impls_prod_count: prod_impls.len(),
        missing_impl: !has_impls,
        internal_impl_only: has_impls && prod_impls.iter().all(|t| anchors.is_domain_anchor(&t.id)),
        infra_impl_only: has_impls && prod_impls.iter().all(|t| anchors.is_infra_anchor(&t.id)),
        used_by_core,
        implemented_by_core: prod_impls.iter().any(|t| anchors.is_core_app_class(&t.id)),
        has_port_annotation: has_port_annotation(iface),
    }
}

/// Port-style signal: jMolecules port annotation, `port` package, or port-like name
pub fn has_port_annotation(iface: &TypeNode) -> bool {
    if iface
        .annotations
        .iter()
        .any(|a| PORT_ANNOTATIONS.contains(&a.qualified_name.as_str()))
    {
        return true;
    }
    if iface.package.to_lowercase().contains("port") {
        return true;
    }
    PORT_NAME_PATTERNS
        .iter()
        .any(|pattern| iface.simple_name.contains(pattern))
}

pub fn is_external_interface(iface: &TypeNode) -> bool {
    EXTERNAL_PREFIXES
        .iter()
        .any(|prefix| iface.qualified_name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ApplicationGraph, GraphBuilder, TypeForm, TypeRef};
    use crate::semantic::{SemanticModel, SourceField, SourceType};

    fn id(name: &str) -> NodeId {
        NodeId::for_type(name)
    }

    #[test]
    fn test_driving_port_factory() {
        let facts = InterfaceFacts::driving_port(id("a.PlaceOrder"), 1, true);
        assert!(facts.is_driving_port_candidate());
        assert!(!facts.is_driven_port_candidate());
        assert!(!facts.is_undecided());
    }

    #[test]
    fn test_driven_port_missing_impl_factory() {
        let facts = InterfaceFacts::driven_port_missing_impl(id("a.OrderRepository"), true);
        assert!(facts.is_driven_port_candidate());
        assert!(!facts.is_driven_port_with_external_impl());
        assert!(!facts.is_driving_port_candidate());

        let unannotated = InterfaceFacts::driven_port_missing_impl(id("a.Thing"), false);
        assert!(!unannotated.is_driven_port_candidate());
        assert!(unannotated.is_driven_port_candidate_without_annotation_check());
    }

    #[test]
    fn test_infra_and_internal_factories() {
        let infra = InterfaceFacts::driven_port_infra_impl(id("a.Notifier"), 2, false);
        assert!(infra.is_driven_port_by_infrastructure_impl());
        assert!(!infra.is_driven_port_with_external_impl());

        let internal = InterfaceFacts::driven_port_internal_impl(id("a.PricingPort"), 1, true);
        assert!(internal.is_driven_port_candidate());
        assert!(internal.is_internal_interface());
    }

    #[test]
    fn test_undecided_when_no_signal() {
        let facts = InterfaceFacts {
            interface_id: id("a.Misc"),
            impls_prod_count: 0,
            missing_impl: true,
            internal_impl_only: false,
            infra_impl_only: false,
            used_by_core: false,
            implemented_by_core: false,
            has_port_annotation: false,
        };
        assert!(facts.is_undecided());
    }

    fn hexagon() -> ApplicationGraph {
        let model = SemanticModel {
            types: vec![
                SourceType::new("com.acme.order.PlaceOrderUseCase", TypeForm::Interface),
                SourceType::new("com.acme.order.OrderRepository", TypeForm::Interface),
                SourceType::new("com.acme.order.OrderService", TypeForm::Class)
                    .implementing("com.acme.order.PlaceOrderUseCase")
                    .with_field(SourceField::private_final(
                        "orders",
                        TypeRef::new("com.acme.order.OrderRepository"),
                    )),
                SourceType::new("com.acme.infrastructure.JpaOrderRepository", TypeForm::Class)
                    .implementing("com.acme.order.OrderRepository"),
                SourceType::new("com.acme.order.test.FakeOrderRepository", TypeForm::Class)
                    .implementing("com.acme.order.OrderRepository"),
                SourceType::new("java.util.function.Supplier", TypeForm::Interface),
            ],
            ..Default::default()
        };
        GraphBuilder::new().build(&model).unwrap()
    }

    #[test]
    fn test_index_derives_port_directions_from_graph() {
        let graph = hexagon();
        let anchors = AnchorContext::analyze(&graph);
        let index = InterfaceFactsIndex::build(&graph.query(), &anchors);

        assert_eq!(index.len(), 2, "external interfaces are skipped");

        let use_case = index.get(&id("com.acme.order.PlaceOrderUseCase")).unwrap();
        assert!(use_case.is_driving_port_candidate());

        let repo = index.get(&id("com.acme.order.OrderRepository")).unwrap();
        assert_eq!(repo.impls_prod_count, 1, "test implementors are ignored");
        assert!(repo.used_by_core);
        assert!(repo.infra_impl_only);
        assert!(repo.is_driven_port_with_external_impl());
        assert!(repo.is_driven_port_by_infrastructure_impl());
    }
}
