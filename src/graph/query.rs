//! Read-only traversal facade over a closed [`ApplicationGraph`].
//!
//! Every operation resolves through [`GraphIndexes`](super::GraphIndexes)
//! rather than scanning the node or edge stores.

use std::collections::HashSet;

use super::application_graph::ApplicationGraph;
use super::model::{
    ConstructorNode, EdgeProof, FieldNode, MethodNode, Node, NodeId, TypeForm, TypeNode,
};

#[derive(Debug, Clone, Copy)]
pub struct GraphQuery<'g> {
    graph: &'g ApplicationGraph,
}

impl<'g> GraphQuery<'g> {
    pub fn new(graph: &'g ApplicationGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g ApplicationGraph {
        self.graph
    }

    fn resolve_types(&self, ids: &'g [NodeId]) -> Vec<&'g TypeNode> {
        ids.iter().filter_map(|id| self.graph.type_node(id)).collect()
    }

    fn resolve_nodes(&self, ids: &'g [NodeId]) -> Vec<&'g Node> {
        ids.iter().filter_map(|id| self.graph.node(id)).collect()
    }

    pub fn type_node(&self, id: &NodeId) -> Option<&'g TypeNode> {
        self.graph.type_node(id)
    }

    /// All types in insertion order
    pub fn types(&self) -> Vec<&'g TypeNode> {
        self.resolve_types(self.graph.indexes().all_types())
    }

    pub fn interfaces(&self) -> Vec<&'g TypeNode> {
        self.types_with_form(TypeForm::Interface)
    }

    pub fn types_in_package(&self, package: &str) -> Vec<&'g TypeNode> {
        self.resolve_types(self.graph.indexes().types_in_package(package))
    }

    pub fn types_with_form(&self, form: TypeForm) -> Vec<&'g TypeNode> {
        self.resolve_types(self.graph.indexes().types_with_form(form))
    }

    pub fn nodes_annotated_with(&self, annotation: &str) -> Vec<&'g Node> {
        self.resolve_nodes(self.graph.indexes().annotated_with(annotation))
    }

    /// Members declared by a type: fields, methods and constructors
    pub fn members_of(&self, type_id: &NodeId) -> Vec<&'g Node> {
        self.resolve_nodes(self.graph.indexes().declared_members(type_id))
    }

    pub fn fields_of(&self, type_id: &NodeId) -> Vec<&'g FieldNode> {
        self.members_of(type_id)
            .into_iter()
            .filter_map(Node::as_field)
            .collect()
    }

    pub fn methods_of(&self, type_id: &NodeId) -> Vec<&'g MethodNode> {
        self.members_of(type_id)
            .into_iter()
            .filter_map(Node::as_method)
            .collect()
    }

    pub fn constructors_of(&self, type_id: &NodeId) -> Vec<&'g ConstructorNode> {
        self.members_of(type_id)
            .into_iter()
            .filter_map(Node::as_constructor)
            .collect()
    }

    pub fn declaring_type_of(&self, member: &NodeId) -> Option<&'g TypeNode> {
        self.graph
            .indexes()
            .declaring_type(member)
            .and_then(|id| self.graph.type_node(id))
    }

    /// Direct superclass present in the graph
    pub fn supertype_of(&self, type_id: &NodeId) -> Option<&'g TypeNode> {
        self.resolve_types(self.graph.indexes().supertypes(type_id))
            .into_iter()
            .next()
    }

    /// Transitive superclass chain, nearest first
    pub fn supertypes_of(&self, type_id: &NodeId) -> Vec<&'g TypeNode> {
        let mut chain = Vec::new();
        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut current = self.supertype_of(type_id);
        while let Some(supertype) = current {
            if !seen.insert(&supertype.id) {
                break;
            }
            chain.push(supertype);
            current = self.supertype_of(&supertype.id);
        }
        chain
    }

    pub fn subtypes_of(&self, type_id: &NodeId) -> Vec<&'g TypeNode> {
        self.resolve_types(self.graph.indexes().subtypes(type_id))
    }

    /// Interfaces a type directly implements, when present in the graph
    pub fn interfaces_of(&self, type_id: &NodeId) -> Vec<&'g TypeNode> {
        self.resolve_types(self.graph.indexes().implemented_interfaces(type_id))
    }

    pub fn implementors_of(&self, interface: &NodeId) -> Vec<&'g TypeNode> {
        self.resolve_types(self.graph.indexes().implementors(interface))
    }

    pub fn fields_of_type(&self, type_id: &NodeId) -> Vec<&'g FieldNode> {
        self.resolve_nodes(self.graph.indexes().fields_by_type(type_id))
            .into_iter()
            .filter_map(Node::as_field)
            .collect()
    }

    pub fn methods_returning(&self, type_id: &NodeId) -> Vec<&'g MethodNode> {
        self.resolve_nodes(self.graph.indexes().methods_by_return_type(type_id))
            .into_iter()
            .filter_map(Node::as_method)
            .collect()
    }

    /// Methods declaring a parameter of the given type
    pub fn methods_with_parameter(&self, type_id: &NodeId) -> Vec<&'g MethodNode> {
        self.members_with_parameter(type_id)
            .into_iter()
            .filter_map(Node::as_method)
            .collect()
    }

    /// Methods and constructors declaring a parameter of the given type
    pub fn members_with_parameter(&self, type_id: &NodeId) -> Vec<&'g Node> {
        self.resolve_nodes(self.graph.indexes().members_by_parameter_type(type_id))
    }

    /// Interfaces whose method signatures mention the given type
    pub fn interfaces_using_in_signature(&self, type_id: &NodeId) -> Vec<&'g TypeNode> {
        self.resolve_types(self.graph.indexes().used_in_signature_of(type_id))
    }

    pub fn types_used_in_signature_of(&self, interface: &NodeId) -> Vec<&'g TypeNode> {
        self.resolve_types(self.graph.indexes().signature_types_of(interface))
    }

    pub fn signature_proofs(&self, interface: &NodeId, used: &NodeId) -> &'g [EdgeProof] {
        self.graph.indexes().signature_proofs(interface, used)
    }

    /// Types whose fields or constructor parameters have the given type
    pub fn types_injecting(&self, type_id: &NodeId) -> Vec<&'g TypeNode> {
        let field_owners = self
            .fields_of_type(type_id)
            .into_iter()
            .map(|field| &field.declaring_type);
        let ctor_owners = self
            .members_with_parameter(type_id)
            .into_iter()
            .filter_map(Node::as_constructor)
            .map(|ctor| &ctor.declaring_type);

        let mut seen = HashSet::new();
        field_owners
            .chain(ctor_owners)
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.graph.type_node(id))
            .collect()
    }

    /// Distinct in-graph types a type depends on through its hierarchy and members.
    ///
    /// Covers EXTENDS and IMPLEMENTS from the type itself plus FIELD_TYPE,
    /// RETURN_TYPE and PARAMETER_TYPE from its members. The type itself is
    /// never part of the result.
    pub fn dependencies_of_type(&self, type_id: &NodeId) -> Vec<NodeId> {
        let indexes = self.graph.indexes();
        let mut seen: HashSet<&NodeId> = HashSet::new();
        seen.insert(type_id);

        let hierarchy = indexes
            .supertypes(type_id)
            .iter()
            .chain(indexes.implemented_interfaces(type_id));
        let member_targets = indexes
            .declared_members(type_id)
            .iter()
            .flat_map(|member| self.graph.edges_from(member))
            .filter(|edge| edge.kind.is_type_usage())
            .map(|edge| &edge.to);

        hierarchy
            .chain(member_targets)
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{Edge, EdgeKind, FieldNode, TypeRef};

    fn field(owner: &str, name: &str, type_name: &str) -> Node {
        Node::Field(FieldNode {
            id: NodeId::for_field(owner, name),
            declaring_type: NodeId::for_type(owner),
            simple_name: name.to_string(),
            package: "a".into(),
            field_type: TypeRef::new(type_name),
            modifiers: vec![],
            annotations: vec![],
            location: None,
        })
    }

    fn sample_graph() -> ApplicationGraph {
        let mut graph = ApplicationGraph::new();
        for (name, form) in [
            ("a.Base", TypeForm::Class),
            ("a.Order", TypeForm::Class),
            ("a.Line", TypeForm::Record),
            ("a.Repo", TypeForm::Interface),
        ] {
            graph
                .add_node(Node::Type(TypeNode::new(name, form)))
                .unwrap();
        }
        graph.add_node(field("a.Order", "lines", "a.Line")).unwrap();
        let edges = [
            Edge::raw(NodeId::for_type("a.Order"), NodeId::for_type("a.Base"), EdgeKind::Extends),
            Edge::raw(
                NodeId::for_type("a.Order"),
                NodeId::for_field("a.Order", "lines"),
                EdgeKind::Declares,
            ),
            Edge::raw(
                NodeId::for_field("a.Order", "lines"),
                NodeId::for_type("a.Line"),
                EdgeKind::FieldType,
            ),
        ];
        for edge in edges {
            graph.add_edge(edge).unwrap();
        }
        graph
    }

    #[test]
    fn test_members_and_declaring_type() {
        let graph = sample_graph();
        let query = graph.query();
        let order = NodeId::for_type("a.Order");

        assert_eq!(query.fields_of(&order).len(), 1);
        assert!(query.methods_of(&order).is_empty());
        assert_eq!(
            query
                .declaring_type_of(&NodeId::for_field("a.Order", "lines"))
                .map(|t| t.simple_name.as_str()),
            Some("Order")
        );
    }

    #[test]
    fn test_dependencies_cover_hierarchy_and_fields() {
        let graph = sample_graph();
        let deps = graph.query().dependencies_of_type(&NodeId::for_type("a.Order"));
        assert_eq!(deps, vec![NodeId::for_type("a.Base"), NodeId::for_type("a.Line")]);
    }

    #[test]
    fn test_supertypes_and_injection() {
        let graph = sample_graph();
        let query = graph.query();
        let supers = query.supertypes_of(&NodeId::for_type("a.Order"));
        assert_eq!(supers.len(), 1);
        assert_eq!(supers[0].simple_name, "Base");

        let owners = query.types_injecting(&NodeId::for_type("a.Line"));
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].simple_name, "Order");
        assert_eq!(query.interfaces().len(), 1);
        assert_eq!(query.types_in_package("a").len(), 4);
    }
}
