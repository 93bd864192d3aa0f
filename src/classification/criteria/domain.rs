//! Criteria for domain roles: aggregates, entities, value objects, identifiers, events.

use super::support::{
    has_identity_field, identity_field, is_concrete_class_or_record, is_immutable, kebab_name,
    names,
};
use crate::classification::criterion::{
    Criterion, PRIORITY_EXPLICIT, PRIORITY_GRAPH, PRIORITY_RELATIONSHIP, PRIORITY_STRONG,
    PRIORITY_WEAK,
};
use crate::classification::evidence::{Evidence, MatchResult};
use crate::classification::kinds::{DomainKind, RoleKind};
use crate::graph::{GraphQuery, NodeId, TypeNode};

pub(crate) const DOMAIN_ANNOTATIONS: &[(&str, DomainKind)] = &[
    ("org.jmolecules.ddd.annotation.AggregateRoot", DomainKind::AggregateRoot),
    ("org.jmolecules.ddd.annotation.Entity", DomainKind::Entity),
    ("org.jmolecules.ddd.annotation.ValueObject", DomainKind::ValueObject),
    ("org.jmolecules.ddd.annotation.Identity", DomainKind::Identifier),
    ("org.jmolecules.event.annotation.DomainEvent", DomainKind::DomainEvent),
    ("org.jmolecules.ddd.annotation.Service", DomainKind::DomainService),
];

pub(crate) const DOMAIN_TYPE_INTERFACES: &[(&str, DomainKind)] = &[
    ("org.jmolecules.ddd.types.AggregateRoot", DomainKind::AggregateRoot),
    ("org.jmolecules.ddd.types.Entity", DomainKind::Entity),
    ("org.jmolecules.ddd.types.ValueObject", DomainKind::ValueObject),
    ("org.jmolecules.ddd.types.Identifier", DomainKind::Identifier),
];

/// Kinds a subtype can inherit from an annotated or marker-implementing parent
const INHERITABLE_KINDS: &[DomainKind] = &[
    DomainKind::AggregateRoot,
    DomainKind::Entity,
    DomainKind::ValueObject,
];

fn explicit_domain_kind(node: &TypeNode) -> Option<(DomainKind, String)> {
    DOMAIN_ANNOTATIONS
        .iter()
        .find(|(annotation, _)| node.has_annotation(annotation))
        .map(|(annotation, kind)| (*kind, format!("annotation {annotation}")))
        .or_else(|| {
            DOMAIN_TYPE_INTERFACES
                .iter()
                .find(|(iface, _)| node.declares_interface(iface))
                .map(|(iface, kind)| (*kind, format!("interface {iface}")))
        })
}

/// jMolecules annotation on the type itself
pub struct ExplicitDomainAnnotationCriterion {
    name: String,
    annotation: &'static str,
    kind: DomainKind,
}

impl ExplicitDomainAnnotationCriterion {
    pub fn new(annotation: &'static str, kind: DomainKind) -> Self {
        Self {
            name: format!("explicit-{}", kebab_name(kind)),
            annotation,
            kind,
        }
    }

    pub fn all() -> Vec<Self> {
        DOMAIN_ANNOTATIONS
            .iter()
            .map(|(annotation, kind)| Self::new(annotation, *kind))
            .collect()
    }
}

impl Criterion for ExplicitDomainAnnotationCriterion {
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
        if !node.has_annotation(self.annotation) {
            return Ok(MatchResult::no_match());
        }
        Ok(MatchResult::high(
            format!("Annotated with @{}", crate::graph::simple_name_of(self.annotation)),
            vec![Evidence::annotation(self.annotation)],
        ))
    }
}

/// Implements a jMolecules type interface such as `AggregateRoot<T, ID>`
pub struct ImplementsDomainTypeCriterion {
    name: String,
    interface: &'static str,
    kind: DomainKind,
}

impl ImplementsDomainTypeCriterion {
    pub fn new(interface: &'static str, kind: DomainKind) -> Self {
        Self {
            name: format!("implements-{}", kebab_name(kind)),
            interface,
            kind,
        }
    }

    pub fn all() -> Vec<Self> {
        DOMAIN_TYPE_INTERFACES
            .iter()
            .map(|(iface, kind)| Self::new(iface, *kind))
            .collect()
    }
}

impl Criterion for ImplementsDomainTypeCriterion {
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
        if node.is_interface() || !node.declares_interface(self.interface) {
            return Ok(MatchResult::no_match());
        }
        Ok(MatchResult::high(
            format!("Implements {}", self.interface),
            vec![Evidence::relationship(
                format!("implements {}", self.interface),
                Vec::new(),
            )],
        ))
    }
}

/// Dominant identity-bearing type of a `*Repository` signature
pub struct RepositoryDominantCriterion;

impl RepositoryDominantCriterion {
    /// Identity-bearing signature type referenced by the most methods; first wins ties
    fn dominant_type<'g>(repository: &TypeNode, query: &GraphQuery<'g>) -> Option<&'g TypeNode> {
        query
            .types_used_in_signature_of(&repository.id)
            .into_iter()
            .filter(|t| !t.is_interface() && has_identity_field(t, query))
            .fold(None::<(&'g TypeNode, usize)>, |best, candidate| {
                let uses = query.signature_proofs(&repository.id, &candidate.id).len();
                match best {
                    Some((_, best_uses)) if best_uses >= uses => best,
                    _ => Some((candidate, uses)),
                }
            })
            .map(|(t, _)| t)
    }
}

impl Criterion for RepositoryDominantCriterion {
    fn name(&self) -> &str {
        "repository-dominant"
    }

    fn priority(&self) -> u32 {
        PRIORITY_STRONG
    }

    fn target_kind(&self) -> RoleKind {
        DomainKind::AggregateRoot.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !is_concrete_class_or_record(node) {
            return Ok(MatchResult::no_match());
        }
        let Some(id_field) = identity_field(node, query) else {
            return Ok(MatchResult::no_match());
        };

        let repositories: Vec<&TypeNode> = query
            .interfaces_using_in_signature(&node.id)
            .into_iter()
            .filter(|iface| iface.simple_name.ends_with("Repository"))
            .filter(|iface| {
                Self::dominant_type(iface, query).is_some_and(|dominant| dominant.id == node.id)
            })
            .collect();

        if repositories.is_empty() {
            return Ok(MatchResult::no_match());
        }

        Ok(MatchResult::high(
            format!(
                "Dominant type of repository [{}] with identity field '{}'",
                names(&repositories),
                id_field.simple_name
            ),
            vec![
                Evidence::relationship(
                    format!("Managed by {}", names(&repositories)),
                    repositories.iter().map(|r| r.id.clone()).collect(),
                ),
                Evidence::structure(format!("Identity field '{}'", id_field.simple_name)),
            ],
        ))
    }
}

/// Record named `*Id` wrapping exactly one component
pub struct RecordSingleIdCriterion;

impl Criterion for RecordSingleIdCriterion {
    fn name(&self) -> &str {
        "record-single-id"
    }

    fn priority(&self) -> u32 {
        PRIORITY_STRONG
    }

    fn target_kind(&self) -> RoleKind {
        DomainKind::Identifier.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !node.is_record() || !node.simple_name.ends_with("Id") {
            return Ok(MatchResult::no_match());
        }
        let fields: Vec<_> = query
            .fields_of(&node.id)
            .into_iter()
            .filter(|f| !f.is_static())
            .collect();
        if fields.len() != 1 {
            return Ok(MatchResult::no_match());
        }
        Ok(MatchResult::high(
            format!("Record wrapping a single {} value", fields[0].field_type.simple_name()),
            vec![
                Evidence::naming("Name ends with 'Id'"),
                Evidence::structure("Record with exactly one component"),
            ],
        ))
    }
}

/// Kind carried over from a supertype or implemented interface.
///
/// One instance exists per inheritable kind, so the target kind stays fixed.
pub struct InheritedClassificationCriterion {
    name: String,
    kind: DomainKind,
}

impl InheritedClassificationCriterion {
    pub fn new(kind: DomainKind) -> Self {
        Self {
            name: format!("inherited-{}", kebab_name(kind)),
            kind,
        }
    }

    pub fn all() -> Vec<Self> {
        INHERITABLE_KINDS.iter().map(|kind| Self::new(*kind)).collect()
    }

    fn parent_kind(&self, parent: &TypeNode) -> Option<String> {
        match explicit_domain_kind(parent) {
            Some((kind, source)) if kind == self.kind => Some(source),
            _ => None,
        }
    }
}

impl Criterion for InheritedClassificationCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        PRIORITY_RELATIONSHIP
    }

    fn target_kind(&self) -> RoleKind {
        self.kind.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if node.is_interface() || explicit_domain_kind(node).is_some() {
            return Ok(MatchResult::no_match());
        }

        let supertypes = query.supertypes_of(&node.id);
        let interfaces = query.interfaces_of(&node.id);
        let inherited = supertypes
            .iter()
            .chain(interfaces.iter())
            .find_map(|parent| self.parent_kind(parent).map(|source| (*parent, source)));

        match inherited {
            Some((parent, source)) => Ok(MatchResult::medium(
                format!("Inherits {} from {} ({})", self.target_kind(), parent.simple_name, source),
                vec![Evidence::relationship(
                    format!("Parent {} carries {}", parent.simple_name, source),
                    vec![parent.id.clone()],
                )],
            )),
            None => Ok(MatchResult::no_match()),
        }
    }
}

/// Immutable, identity-less type held in a field of an identity-bearing type
pub struct EmbeddedValueObjectCriterion;

impl Criterion for EmbeddedValueObjectCriterion {
    fn name(&self) -> &str {
        "embedded-value-object"
    }

    fn priority(&self) -> u32 {
        PRIORITY_GRAPH
    }

    fn target_kind(&self) -> RoleKind {
        DomainKind::ValueObject.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !is_concrete_class_or_record(node)
            || has_identity_field(node, query)
            || !is_immutable(node, query)
        {
            return Ok(MatchResult::no_match());
        }

        let mut containers: Vec<&TypeNode> = Vec::new();
        for field in query.fields_of_type(&node.id) {
            if let Some(owner) = query.type_node(&field.declaring_type) {
                if owner.id != node.id
                    && has_identity_field(owner, query)
                    && !containers.iter().any(|c| c.id == owner.id)
                {
                    containers.push(owner);
                }
            }
        }
        if containers.is_empty() {
            return Ok(MatchResult::no_match());
        }

        let justification = format!("Immutable type embedded in [{}]", names(&containers));
        let evidence = vec![
            Evidence::relationship(
                format!("Embedded in: {}", names(&containers)),
                containers.iter().map(|c| c.id.clone()).collect::<Vec<NodeId>>(),
            ),
            Evidence::structure("No identity field, immutable"),
        ];
        Ok(if node.is_record() {
            MatchResult::high(justification, evidence)
        } else {
            MatchResult::medium(justification, evidence)
        })
    }
}

/// Immutable type named `*Event`
pub struct NamingDomainEventCriterion;

impl Criterion for NamingDomainEventCriterion {
    fn name(&self) -> &str {
        "naming-domain-event"
    }

    fn priority(&self) -> u32 {
        PRIORITY_WEAK
    }

    fn target_kind(&self) -> RoleKind {
        DomainKind::DomainEvent.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if !is_concrete_class_or_record(node)
            || !node.simple_name.ends_with("Event")
            || !is_immutable(node, query)
        {
            return Ok(MatchResult::no_match());
        }
        Ok(MatchResult::medium(
            "Immutable type named like an event",
            vec![Evidence::naming("Name ends with 'Event'")],
        ))
    }
}

/// Mutable class carrying an identity field
pub struct IdentityEntityCriterion;

impl Criterion for IdentityEntityCriterion {
    fn name(&self) -> &str {
        "identity-entity"
    }

    fn priority(&self) -> u32 {
        PRIORITY_WEAK
    }

    fn target_kind(&self) -> RoleKind {
        DomainKind::Entity.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if node.form != crate::graph::TypeForm::Class {
            return Ok(MatchResult::no_match());
        }
        match identity_field(node, query) {
            Some(field) => Ok(MatchResult::low(
                format!("Class with identity field '{}'", field.simple_name),
                vec![Evidence::structure(format!("Identity field '{}'", field.simple_name))],
            )),
            None => Ok(MatchResult::no_match()),
        }
    }
}
