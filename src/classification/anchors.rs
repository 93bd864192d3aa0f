//! Anchor detection: where does a concrete class sit relative to the core?
//!
//! Each non-interface type receives exactly one anchor, checked in order:
//! driving annotations, infrastructure annotations, infrastructure package,
//! infrastructure-typed fields, and finally the domain default. Interface
//! facts use anchors to tell core implementations from adapters.

use std::collections::{HashMap, HashSet};
use tracing::debug_span;

use crate::graph::{ApplicationGraph, GraphQuery, NodeId, TypeNode};
use crate::observability::{set_phase, AnalysisPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Entry point invoked by external actors (controllers, listeners)
    Driving,
    /// Adapter toward technical infrastructure
    Infra,
    /// Everything else: domain and application code
    Domain,
}

const DRIVING_ANNOTATIONS: &[&str] = &[
    "org.springframework.web.bind.annotation.RestController",
    "org.springframework.stereotype.Controller",
    "org.springframework.kafka.annotation.KafkaListener",
    "org.springframework.amqp.rabbit.annotation.RabbitListener",
    "org.springframework.jms.annotation.JmsListener",
    "org.springframework.scheduling.annotation.Scheduled",
    "jakarta.ws.rs.Path",
    "javax.ws.rs.Path",
];

const INFRA_ANNOTATIONS: &[&str] = &[
    "org.springframework.stereotype.Repository",
    "org.springframework.data.mongodb.core.mapping.Document",
    "org.springframework.cloud.openfeign.FeignClient",
    "jakarta.persistence.Entity",
    "jakarta.persistence.Table",
    "jakarta.persistence.Embeddable",
    "javax.persistence.Entity",
    "javax.persistence.Table",
    "javax.persistence.Embeddable",
];

const INFRA_FIELD_TYPES: &[&str] = &[
    "org.springframework.jdbc.core.JdbcTemplate",
    "org.springframework.jdbc.core.namedparam.NamedParameterJdbcTemplate",
    "jakarta.persistence.EntityManager",
    "javax.persistence.EntityManager",
    "org.springframework.web.client.RestTemplate",
    "org.springframework.web.reactive.function.client.WebClient",
    "org.springframework.kafka.core.KafkaTemplate",
    "org.springframework.amqp.rabbit.core.RabbitTemplate",
    "org.springframework.data.mongodb.core.MongoTemplate",
    "javax.sql.DataSource",
];

const INFRA_FIELD_PREFIXES: &[&str] = &["feign.", "software.amazon.awssdk.", "io.grpc."];

const INFRA_PACKAGE_SEGMENTS: &[&str] = &["infrastructure", "infra", "adapter", "adapters"];

/// Anchor assignment plus the core application classes derived from it
#[derive(Debug, Clone, Default)]
pub struct AnchorContext {
    anchors: HashMap<NodeId, AnchorKind>,
    core_classes: HashSet<NodeId>,
}

impl AnchorContext {
    pub fn analyze(graph: &ApplicationGraph) -> Self {
        let _phase = set_phase(AnalysisPhase::AnchorDetection);
        let _span = debug_span!("anchor_detection").entered();
        let query = graph.query();

        let anchors: HashMap<NodeId, AnchorKind> = query
            .types()
            .into_iter()
            .filter(|t| !t.is_interface())
            .map(|t| (t.id.clone(), detect_anchor(t, &query)))
            .collect();

        let core_classes = query
            .types()
            .into_iter()
            .filter(|t| anchors.get(&t.id) == Some(&AnchorKind::Domain))
            .filter(|t| !is_test_code(t))
            .filter(|t| depends_on_interface(t, &query))
            .map(|t| t.id.clone())
            .collect::<HashSet<_>>();

        log::debug!(
            "Anchors: {} types, {} core application classes",
            anchors.len(),
            core_classes.len()
        );

        Self {
            anchors,
            core_classes,
        }
    }

    pub fn anchor(&self, id: &NodeId) -> Option<AnchorKind> {
        self.anchors.get(id).copied()
    }

    pub fn is_domain_anchor(&self, id: &NodeId) -> bool {
        self.anchor(id) == Some(AnchorKind::Domain)
    }

    pub fn is_infra_anchor(&self, id: &NodeId) -> bool {
        self.anchor(id) == Some(AnchorKind::Infra)
    }

    pub fn is_driving_anchor(&self, id: &NodeId) -> bool {
        self.anchor(id) == Some(AnchorKind::Driving)
    }

    /// Domain-anchored class that depends on an in-graph interface
    pub fn is_core_app_class(&self, id: &NodeId) -> bool {
        self.core_classes.contains(id)
    }

    pub fn core_class_count(&self) -> usize {
        self.core_classes.len()
    }
}

/// Anchor of a single concrete type
pub fn detect_anchor(node: &TypeNode, query: &GraphQuery<'_>) -> AnchorKind {
    if node
        .annotations
        .iter()
        .any(|a| DRIVING_ANNOTATIONS.contains(&a.qualified_name.as_str()))
    {
        return AnchorKind::Driving;
    }
    if node
        .annotations
        .iter()
        .any(|a| INFRA_ANNOTATIONS.contains(&a.qualified_name.as_str()))
    {
        return AnchorKind::Infra;
    }
    if is_infrastructure_package(&node.package) {
        return AnchorKind::Infra;
    }
    if query
        .fields_of(&node.id)
        .iter()
        .any(|f| is_infrastructure_type(&f.field_type.qualified_name))
    {
        return AnchorKind::Infra;
    }
    AnchorKind::Domain
}

pub fn is_infrastructure_package(package: &str) -> bool {
    package
        .split('.')
        .any(|segment| INFRA_PACKAGE_SEGMENTS.contains(&segment))
}

/// Well-known technical types that only adapters should touch
pub fn is_infrastructure_type(qualified_name: &str) -> bool {
    INFRA_FIELD_TYPES.contains(&qualified_name)
        || INFRA_FIELD_PREFIXES
            .iter()
            .any(|prefix| qualified_name.starts_with(prefix))
}

pub fn is_test_code(node: &TypeNode) -> bool {
    let pkg = node.package.as_str();
    pkg.contains(".test.")
        || pkg.ends_with(".test")
        || pkg.contains(".tests.")
        || pkg.ends_with(".tests")
}

fn depends_on_interface(node: &TypeNode, query: &GraphQuery<'_>) -> bool {
    let through_fields = query
        .fields_of(&node.id)
        .into_iter()
        .map(|f| NodeId::for_type(&f.field_type.qualified_name));
    let through_ctors = query
        .constructors_of(&node.id)
        .into_iter()
        .flat_map(|c| c.parameters.iter())
        .map(|p| NodeId::for_type(&p.param_type.qualified_name));

    through_fields
        .chain(through_ctors)
        .any(|id| query.type_node(&id).is_some_and(TypeNode::is_interface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, TypeForm, TypeRef};
    use crate::semantic::{SemanticModel, SourceField, SourceType};

    fn graph_of(types: Vec<SourceType>) -> ApplicationGraph {
        GraphBuilder::new()
            .build(&SemanticModel {
                types,
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn test_anchor_precedence() {
        let graph = graph_of(vec![
            SourceType::new("com.acme.web.OrderController", TypeForm::Class)
                .annotated("org.springframework.web.bind.annotation.RestController"),
            SourceType::new("com.acme.infrastructure.JpaOrder", TypeForm::Class)
                .annotated("jakarta.persistence.Entity"),
            SourceType::new("com.acme.adapters.out.Mailer", TypeForm::Class),
            SourceType::new("com.acme.order.OrderDao", TypeForm::Class).with_field(
                SourceField::new("jdbc", TypeRef::new("org.springframework.jdbc.core.JdbcTemplate")),
            ),
            SourceType::new("com.acme.order.Order", TypeForm::Class),
        ]);
        let anchors = AnchorContext::analyze(&graph);

        assert!(anchors.is_driving_anchor(&NodeId::for_type("com.acme.web.OrderController")));
        assert!(anchors.is_infra_anchor(&NodeId::for_type("com.acme.infrastructure.JpaOrder")));
        assert!(anchors.is_infra_anchor(&NodeId::for_type("com.acme.adapters.out.Mailer")));
        assert!(anchors.is_infra_anchor(&NodeId::for_type("com.acme.order.OrderDao")));
        assert!(anchors.is_domain_anchor(&NodeId::for_type("com.acme.order.Order")));
    }

    #[test]
    fn test_core_app_class_requires_interface_dependency() {
        let graph = graph_of(vec![
            SourceType::new("com.acme.order.OrderRepository", TypeForm::Interface),
            SourceType::new("com.acme.order.OrderService", TypeForm::Class).with_field(
                SourceField::private_final("repo", TypeRef::new("com.acme.order.OrderRepository")),
            ),
            SourceType::new("com.acme.order.Money", TypeForm::Record),
        ]);
        let anchors = AnchorContext::analyze(&graph);

        assert!(anchors.is_core_app_class(&NodeId::for_type("com.acme.order.OrderService")));
        assert!(!anchors.is_core_app_class(&NodeId::for_type("com.acme.order.Money")));
        assert_eq!(anchors.anchor(&NodeId::for_type("com.acme.order.OrderRepository")), None);
    }

    #[test]
    fn test_test_packages() {
        let node = |pkg: &str| TypeNode::new(&format!("{pkg}.X"), TypeForm::Class);
        assert!(is_test_code(&node("com.acme.test")));
        assert!(is_test_code(&node("com.acme.tests.fixtures")));
        assert!(!is_test_code(&node("com.acme.testing")));
    }
}
