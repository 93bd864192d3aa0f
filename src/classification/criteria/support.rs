//! Structural predicates shared by the built-in criteria.

use crate::classification::kinds::{PortKind, RoleKind};
use crate::graph::{FieldNode, GraphQuery, TypeForm, TypeNode};

/// Field named `id` or `<simpleName>Id`, ignoring case
pub fn identity_field<'g>(node: &TypeNode, query: &GraphQuery<'g>) -> Option<&'g FieldNode> {
    let own_id = format!("{}id", node.simple_name.to_ascii_lowercase());
    query.fields_of(&node.id).into_iter().find(|field| {
        !field.is_static() && {
            let name = field.simple_name.to_ascii_lowercase();
            name == "id" || name == own_id
        }
    })
}

pub fn has_identity_field(node: &TypeNode, query: &GraphQuery<'_>) -> bool {
    identity_field(node, query).is_some()
}

/// Records, or classes whose instance fields are all final and that expose no setters
pub fn is_immutable(node: &TypeNode, query: &GraphQuery<'_>) -> bool {
    if node.is_record() {
        return true;
    }
    let fields_final = query
        .fields_of(&node.id)
        .iter()
        .filter(|f| !f.is_static())
        .all(|f| f.is_final());
    let no_setters = !query.methods_of(&node.id).iter().any(|m| m.is_setter());
    fields_final && no_setters
}

pub fn is_concrete_class_or_record(node: &TypeNode) -> bool {
    matches!(node.form, TypeForm::Class | TypeForm::Record)
}

/// Driven port kind suggested by an interface name
pub fn infer_driven_kind(simple_name: &str) -> PortKind {
    if simple_name.contains("Repository") {
        PortKind::Repository
    } else if simple_name.contains("Gateway") {
        PortKind::Gateway
    } else if simple_name.contains("Publisher") {
        PortKind::EventPublisher
    } else {
        PortKind::DrivenPort
    }
}

/// `AGGREGATE_ROOT` -> `aggregate-root`, used to name per-kind criterion instances
pub fn kebab_name(kind: impl Into<RoleKind>) -> String {
    kind.into().as_str().to_lowercase().replace('_', "-")
}

pub fn has_package_segment(package: &str, segment: &str) -> bool {
    package.split('.').any(|s| s == segment)
}

pub fn names(nodes: &[&TypeNode]) -> String {
    nodes
        .iter()
        .map(|n| n.simple_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ApplicationGraph, GraphBuilder, Modifier, TypeRef};
    use crate::semantic::{SemanticModel, SourceField, SourceMethod, SourceType};

    fn graph_of(types: Vec<SourceType>) -> ApplicationGraph {
        GraphBuilder::new()
            .build(&SemanticModel {
                types,
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn test_identity_field_names() {
        let graph = graph_of(vec![
            SourceType::new("a.Order", TypeForm::Class)
                .with_field(SourceField::private_final("orderId", TypeRef::new("a.OrderId"))),
            SourceType::new("a.Line", TypeForm::Class)
                .with_field(SourceField::private_final("id", TypeRef::new("long"))),
            SourceType::new("a.Money", TypeForm::Record)
                .with_field(SourceField::private_final("customerId", TypeRef::new("a.CustomerId"))),
        ]);
        let query = graph.query();
        let ty = |name: &str| query.type_node(&crate::graph::NodeId::for_type(name)).unwrap();

        assert_eq!(
            identity_field(ty("a.Order"), &query).map(|f| f.simple_name.as_str()),
            Some("orderId")
        );
        assert!(has_identity_field(ty("a.Line"), &query));
        assert!(!has_identity_field(ty("a.Money"), &query));
    }

    #[test]
    fn test_immutability() {
        let mut mutable = SourceField::new("amount", TypeRef::new("long"));
        mutable.modifiers = vec![Modifier::Private];
        let graph = graph_of(vec![
            SourceType::new("a.Price", TypeForm::Class)
                .with_field(SourceField::private_final("amount", TypeRef::new("long"))),
            SourceType::new("a.Counter", TypeForm::Class).with_field(mutable),
            SourceType::new("a.Label", TypeForm::Class)
                .with_field(SourceField::private_final("text", TypeRef::new("java.lang.String")))
                .with_method(
                    SourceMethod::new("setText", TypeRef::void())
                        .with_parameter("text", TypeRef::new("java.lang.String")),
                ),
        ]);
        let query = graph.query();
        let ty = |name: &str| query.type_node(&crate::graph::NodeId::for_type(name)).unwrap();

        assert!(is_immutable(ty("a.Price"), &query));
        assert!(!is_immutable(ty("a.Counter"), &query));
        assert!(!is_immutable(ty("a.Label"), &query));
    }

    #[test]
    fn test_infer_driven_kind() {
        assert_eq!(infer_driven_kind("OrderRepository"), PortKind::Repository);
        assert_eq!(infer_driven_kind("PaymentGateway"), PortKind::Gateway);
        assert_eq!(infer_driven_kind("OrderEventPublisher"), PortKind::EventPublisher);
        assert_eq!(infer_driven_kind("Clock"), PortKind::DrivenPort);
    }
}
