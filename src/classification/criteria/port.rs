//! Criteria for port roles. Only interfaces are evaluated.

use std::sync::Arc;

use super::support::{
    has_identity_field, has_package_segment, infer_driven_kind, kebab_name, names,
};
use crate::classification::anchors::AnchorContext;
use crate::classification::criterion::{
    Criterion, PRIORITY_EXPLICIT, PRIORITY_GRAPH, PRIORITY_RELATIONSHIP, PRIORITY_SEMANTIC,
    PRIORITY_STRONG, PRIORITY_WEAK,
};
use crate::classification::evidence::{Evidence, MatchResult};
use crate::classification::interface_facts::{InterfaceFacts, InterfaceFactsIndex};
use crate::classification::kinds::{PortKind, RoleKind};
use crate::graph::{GraphQuery, TypeNode};

const PORT_ANNOTATIONS: &[(&str, PortKind)] = &[
    ("org.jmolecules.ddd.annotation.Repository", PortKind::Repository),
    ("org.jmolecules.architecture.hexagonal.PrimaryPort", PortKind::UseCase),
    ("org.jmolecules.architecture.hexagonal.SecondaryPort", PortKind::DrivenPort),
];

const PORT_SUFFIXES: &[(&str, PortKind)] = &[
    ("Repository", PortKind::Repository),
    ("UseCase", PortKind::UseCase),
    ("Gateway", PortKind::Gateway),
];

const COMMAND_VERBS: &[&str] = &[
    "create", "update", "delete", "remove", "place", "cancel", "register", "submit", "execute",
    "handle", "process", "approve", "reject",
];

const QUERY_VERBS: &[&str] = &["find", "get", "list", "search", "query", "count", "exists", "fetch"];

fn starts_with_verb(method_name: &str, verbs: &[&str]) -> bool {
    verbs.iter().any(|verb| {
        method_name.strip_prefix(verb).is_some_and(|rest| {
            rest.is_empty() || rest.starts_with(|c: char| c.is_ascii_uppercase())
        })
    })
}

/// jMolecules port annotation on the interface
pub struct ExplicitPortAnnotationCriterion {
    name: String,
    annotation: &'static str,
    kind: PortKind,
}

impl ExplicitPortAnnotationCriterion {
    pub fn all() -> Vec<Self> {
        PORT_ANNOTATIONS
            .iter()
            .map(|(annotation, kind)| Self {
                name: format!(
                    "explicit-{}",
                    crate::graph::simple_name_of(annotation).to_lowercase()
                ),
                annotation,
                kind: *kind,
            })
            .collect()
    }
}

impl Criterion for ExplicitPortAnnotationCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        PRIORITY_EXPLICIT
    }

    fn target_kind(&self) -> RoleKind {
        self.kind.into()
    }

    fn evaluate(&self, node: &TypeNode, _query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !node.is_interface() || !node.has_annotation(self.annotation) {
            return Ok(MatchResult::no_match());
        }
        Ok(MatchResult::high(
            format!("Annotated with @{}", crate::graph::simple_name_of(self.annotation)),
            vec![Evidence::annotation(self.annotation)],
        ))
    }
}

/// Interface implemented by core code and not consumed by it
pub struct SemanticDrivingPortCriterion {
    facts: Arc<InterfaceFactsIndex>,
}

impl SemanticDrivingPortCriterion {
    pub fn new(facts: Arc<InterfaceFactsIndex>) -> Self {
        Self { facts }
    }
}

impl Criterion for SemanticDrivingPortCriterion {
    fn name(&self) -> &str {
        "semantic-driving-port"
    }

    fn priority(&self) -> u32 {
        PRIORITY_SEMANTIC
    }

    fn target_kind(&self) -> RoleKind {
        PortKind::UseCase.into()
    }

    fn evaluate(&self, node: &TypeNode, _query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        match self.facts.get(&node.id) {
            Some(facts) if facts.is_driving_port_candidate() => Ok(MatchResult::high(
                "Implemented by core application code and not consumed by it",
                vec![Evidence::relationship(
                    format!("{} production implementation(s)", facts.impls_prod_count),
                    Vec::new(),
                )],
            )),
            _ => Ok(MatchResult::no_match()),
        }
    }
}

/// Interface consumed by the core and fulfilled outside it.
///
/// One instance per driven kind; each matches only when the name-inferred
/// kind equals its own.
pub struct SemanticDrivenPortCriterion {
    name: String,
    facts: Arc<InterfaceFactsIndex>,
    kind: PortKind,
}

impl SemanticDrivenPortCriterion {
    pub fn new(facts: Arc<InterfaceFactsIndex>, kind: PortKind) -> Self {
        Self {
            name: format!("semantic-driven-{}", kebab_name(kind)),
            facts,
            kind,
        }
    }

    pub fn all(facts: &Arc<InterfaceFactsIndex>) -> Vec<Self> {
        [
            PortKind::Repository,
            PortKind::Gateway,
            PortKind::EventPublisher,
            PortKind::DrivenPort,
        ]
        .into_iter()
        .map(|kind| Self::new(Arc::clone(facts), kind))
        .collect()
    }

    fn driven_shape(facts: &InterfaceFacts) -> Option<&'static str> {
        if facts.is_driven_port_candidate() {
            Some("used by core with no external implementation")
        } else if facts.is_driven_port_with_external_impl() {
            Some("used by core and implemented outside it")
        } else if facts.is_driven_port_by_infrastructure_impl() {
            Some("implemented only by infrastructure adapters")
        } else {
            None
        }
    }
}

impl Criterion for SemanticDrivenPortCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        PRIORITY_SEMANTIC
    }

    fn target_kind(&self) -> RoleKind {
        self.kind.into()
    }

    fn evaluate(&self, node: &TypeNode, _query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        let Some(facts) = self.facts.get(&node.id) else {
            return Ok(MatchResult::no_match());
        };
        if infer_driven_kind(&node.simple_name) != self.kind {
            return Ok(MatchResult::no_match());
        }
        match Self::driven_shape(facts) {
            Some(shape) => Ok(MatchResult::high(
                format!("Driven port: {shape}"),
                vec![Evidence::relationship(shape, Vec::new())],
            )),
            None => Ok(MatchResult::no_match()),
        }
    }
}

/// `*Repository`, `*UseCase` or `*Gateway` interface
pub struct PortNamingCriterion {
    name: String,
    suffix: &'static str,
    kind: PortKind,
}

impl PortNamingCriterion {
    pub fn all() -> Vec<Self> {
        PORT_SUFFIXES
            .iter()
            .map(|(suffix, kind)| Self {
                name: format!("naming-{}", suffix.to_lowercase()),
                suffix,
                kind: *kind,
            })
            .collect()
    }
}

impl Criterion for PortNamingCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        PRIORITY_STRONG
    }

    fn target_kind(&self) -> RoleKind {
        self.kind.into()
    }

    fn evaluate(&self, node: &TypeNode, _query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !node.is_interface() || !node.simple_name.ends_with(self.suffix) {
            return Ok(MatchResult::no_match());
        }
        Ok(MatchResult::high(
            format!("Interface name ends with '{}'", self.suffix),
            vec![Evidence::naming(format!("Suffix '{}'", self.suffix))],
        ))
    }
}

/// Interface whose operations take `*Command` parameters or are named with command verbs
pub struct CommandPatternCriterion;

impl Criterion for CommandPatternCriterion {
    fn name(&self) -> &str {
        "command-pattern"
    }

    fn priority(&self) -> u32 {
        PRIORITY_RELATIONSHIP
    }

    fn target_kind(&self) -> RoleKind {
        PortKind::Command.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !node.is_interface() || node.simple_name.contains("Repository") {
            return Ok(MatchResult::no_match());
        }
        let methods = query.methods_of(&node.id);
        if methods.is_empty() {
            return Ok(MatchResult::no_match());
        }

        let takes_command = methods.iter().any(|m| {
            m.parameters
                .iter()
                .any(|p| p.param_type.simple_name().ends_with("Command"))
        });
        let all_commands = methods
            .iter()
            .all(|m| starts_with_verb(&m.simple_name, COMMAND_VERBS));

        if takes_command {
            Ok(MatchResult::medium(
                "Operations accept command objects",
                vec![Evidence::structure("Parameter type ends with 'Command'")],
            ))
        } else if all_commands {
            Ok(MatchResult::medium(
                "Every operation is named with a command verb",
                vec![Evidence::naming("Command verbs")],
            ))
        } else {
            Ok(MatchResult::no_match())
        }
    }
}

/// Interface whose operations all read: query verbs with a non-void result
pub struct QueryPatternCriterion;

impl Criterion for QueryPatternCriterion {
    fn name(&self) -> &str {
        "query-pattern"
    }

    fn priority(&self) -> u32 {
        PRIORITY_RELATIONSHIP
    }

    fn target_kind(&self) -> RoleKind {
        PortKind::Query.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !node.is_interface() || node.simple_name.contains("Repository") {
            return Ok(MatchResult::no_match());
        }
        let methods = query.methods_of(&node.id);
        if methods.is_empty() {
            return Ok(MatchResult::no_match());
        }

        let takes_query = methods.iter().any(|m| {
            m.parameters
                .iter()
                .any(|p| p.param_type.simple_name().ends_with("Query"))
        });
        let all_reads = methods
            .iter()
            .all(|m| !m.return_type.is_void() && starts_with_verb(&m.simple_name, QUERY_VERBS));

        if takes_query || all_reads {
            Ok(MatchResult::medium(
                "Operations only read state",
                vec![Evidence::naming("Query verbs with results")],
            ))
        } else {
            Ok(MatchResult::no_match())
        }
    }
}

/// Injected into domain classes and not implemented inside the domain
pub struct InjectedAsDependencyCriterion {
    anchors: Arc<AnchorContext>,
}

impl InjectedAsDependencyCriterion {
    pub fn new(anchors: Arc<AnchorContext>) -> Self {
        Self { anchors }
    }
}

impl Criterion for InjectedAsDependencyCriterion {
    fn name(&self) -> &str {
        "injected-as-dependency"
    }

    fn priority(&self) -> u32 {
        PRIORITY_RELATIONSHIP
    }

    fn target_kind(&self) -> RoleKind {
        PortKind::DrivenPort.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !node.is_interface() {
            return Ok(MatchResult::no_match());
        }
        let consumers: Vec<&TypeNode> = query
            .types_injecting(&node.id)
            .into_iter()
            .filter(|t| self.anchors.is_domain_anchor(&t.id))
            .collect();
        if consumers.is_empty() {
            return Ok(MatchResult::no_match());
        }
        let implemented_in_domain = query
            .implementors_of(&node.id)
            .iter()
            .any(|t| self.anchors.is_domain_anchor(&t.id));
        if implemented_in_domain {
            return Ok(MatchResult::no_match());
        }

        Ok(MatchResult::medium(
            format!("Injected into [{}]", names(&consumers)),
            vec![Evidence::relationship(
                format!("Injected into {}", names(&consumers)),
                consumers.iter().map(|t| t.id.clone()).collect(),
            )],
        ))
    }
}

/// Unimplemented interface whose signatures carry identity-bearing types
pub struct SignatureBasedDrivenPortCriterion;

impl Criterion for SignatureBasedDrivenPortCriterion {
    fn name(&self) -> &str {
        "signature-based-driven-port"
    }

    fn priority(&self) -> u32 {
        PRIORITY_GRAPH
    }

    fn target_kind(&self) -> RoleKind {
        PortKind::DrivenPort.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !node.is_interface() || !query.implementors_of(&node.id).is_empty() {
            return Ok(MatchResult::no_match());
        }
        let aggregates: Vec<&TypeNode> = query
            .types_used_in_signature_of(&node.id)
            .into_iter()
            .filter(|t| has_identity_field(t, query))
            .collect();
        if aggregates.is_empty() {
            return Ok(MatchResult::no_match());
        }

        Ok(MatchResult::medium(
            format!("Unimplemented contract over [{}]", names(&aggregates)),
            vec![Evidence::relationship(
                format!("Signature uses {}", names(&aggregates)),
                aggregates.iter().map(|t| t.id.clone()).collect(),
            )],
        ))
    }
}

/// Weak hint from an `in` or `out` package segment
pub struct PackageDirectionCriterion {
    name: &'static str,
    segment: &'static str,
    kind: PortKind,
}

impl PackageDirectionCriterion {
    pub fn inbound() -> Self {
        Self {
            name: "package-in",
            segment: "in",
            kind: PortKind::UseCase,
        }
    }

    pub fn outbound() -> Self {
        Self {
            name: "package-out",
            segment: "out",
            kind: PortKind::DrivenPort,
        }
    }
}

impl Criterion for PackageDirectionCriterion {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> u32 {
        PRIORITY_WEAK
    }

    fn target_kind(&self) -> RoleKind {
        self.kind.into()
    }

    fn evaluate(&self, node: &TypeNode, _query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !node.is_interface() || !has_package_segment(&node.package, self.segment) {
            return Ok(MatchResult::no_match());
        }
        Ok(MatchResult::low(
            format!("Declared in a '{}' package", self.segment),
            vec![Evidence::structure(format!("Package {}", node.package))],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::evidence::ConfidenceLevel;
    use crate::graph::{ApplicationGraph, GraphBuilder, NodeId, TypeForm, TypeRef};
    use crate::semantic::{SemanticModel, SourceField, SourceMethod, SourceType};

    fn graph_of(types: Vec<SourceType>) -> ApplicationGraph {
        GraphBuilder::new()
            .build(&SemanticModel {
                types,
                ..Default::default()
            })
            .unwrap()
    }

    fn eval(criterion: &dyn Criterion, graph: &ApplicationGraph, name: &str) -> MatchResult {
        let query = graph.query();
        let node = query.type_node(&NodeId::for_type(name)).unwrap();
        criterion.evaluate(node, &query).unwrap()
    }

    #[test]
    fn test_semantic_driven_kind_follows_name() {
        let facts = Arc::new(InterfaceFactsIndex::from_facts([
            InterfaceFacts::driven_port_missing_impl(NodeId::for_type("shop.OrderRepository"), true),
        ]));
        let graph = graph_of(vec![SourceType::new("shop.OrderRepository", TypeForm::Interface)]);

        let results: Vec<(PortKind, bool)> = SemanticDrivenPortCriterion::all(&facts)
            .iter()
            .map(|c| (c.kind, eval(c, &graph, "shop.OrderRepository").is_match()))
            .collect();

        assert_eq!(
            results,
            vec![
                (PortKind::Repository, true),
                (PortKind::Gateway, false),
                (PortKind::EventPublisher, false),
                (PortKind::DrivenPort, false),
            ]
        );
    }

    #[test]
    fn test_semantic_driving_port() {
        let facts = Arc::new(InterfaceFactsIndex::from_facts([InterfaceFacts::driving_port(
            NodeId::for_type("shop.PlaceOrder"),
            1,
            false,
        )]));
        let graph = graph_of(vec![SourceType::new("shop.PlaceOrder", TypeForm::Interface)]);
        let result = eval(&SemanticDrivingPortCriterion::new(facts), &graph, "shop.PlaceOrder");
        assert_eq!(result.confidence(), Some(ConfidenceLevel::High));
    }

    #[test]
    fn test_command_and_query_patterns() {
        let graph = graph_of(vec![
            SourceType::new("shop.OrderCommands", TypeForm::Interface)
                .with_method(
                    SourceMethod::new("placeOrder", TypeRef::void())
                        .with_parameter("cmd", TypeRef::new("shop.PlaceOrderCommand")),
                ),
            SourceType::new("shop.OrderQueries", TypeForm::Interface)
                .with_method(SourceMethod::new("findAll", TypeRef::new("java.util.List")))
                .with_method(SourceMethod::new("countOpen", TypeRef::new("long"))),
            SourceType::new("shop.Mixed", TypeForm::Interface)
                .with_method(SourceMethod::new("getName", TypeRef::new("java.lang.String")))
                .with_method(SourceMethod::new("reset", TypeRef::void())),
        ]);

        assert!(eval(&CommandPatternCriterion, &graph, "shop.OrderCommands").is_match());
        assert!(!eval(&QueryPatternCriterion, &graph, "shop.OrderCommands").is_match());
        assert!(eval(&QueryPatternCriterion, &graph, "shop.OrderQueries").is_match());
        assert!(!eval(&CommandPatternCriterion, &graph, "shop.Mixed").is_match());
        assert!(!eval(&QueryPatternCriterion, &graph, "shop.Mixed").is_match());
    }

    #[test]
    fn test_injected_as_dependency() {
        let graph = graph_of(vec![
            SourceType::new("shop.Clock", TypeForm::Interface),
            SourceType::new("shop.Billing", TypeForm::Class)
                .with_field(SourceField::private_final("clock", TypeRef::new("shop.Clock"))),
        ]);
        let anchors = Arc::new(AnchorContext::analyze(&graph));
        let criterion = InjectedAsDependencyCriterion::new(anchors);
        assert!(eval(&criterion, &graph, "shop.Clock").is_match());
    }

    #[test]
    fn test_signature_based_driven_port() {
        let graph = graph_of(vec![
            SourceType::new("shop.Order", TypeForm::Class)
                .with_field(SourceField::private_final("id", TypeRef::new("long"))),
            SourceType::new("shop.OrderArchive", TypeForm::Interface)
                .with_method(SourceMethod::new("load", TypeRef::new("shop.Order"))),
        ]);
        assert!(eval(&SignatureBasedDrivenPortCriterion, &graph, "shop.OrderArchive").is_match());
    }

    #[test]
    fn test_package_direction() {
        let graph = graph_of(vec![
            SourceType::new("shop.port.in.PlaceOrder", TypeForm::Interface),
            SourceType::new("shop.port.out.Notifier", TypeForm::Interface),
        ]);
        assert!(eval(&PackageDirectionCriterion::inbound(), &graph, "shop.port.in.PlaceOrder").is_match());
        assert!(!eval(&PackageDirectionCriterion::inbound(), &graph, "shop.port.out.Notifier").is_match());
        assert_eq!(
            eval(&PackageDirectionCriterion::outbound(), &graph, "shop.port.out.Notifier").confidence(),
            Some(ConfidenceLevel::Low)
        );
    }

    #[test]
    fn test_verb_prefix_requires_word_boundary() {
        assert!(starts_with_verb("findById", QUERY_VERBS));
        assert!(!starts_with_verb("finder", QUERY_VERBS));
        assert!(starts_with_verb("handle", COMMAND_VERBS));
    }
}
