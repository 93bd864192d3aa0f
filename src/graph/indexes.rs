//! Lookup structures maintained incrementally as the graph is populated.
//!
//! Every index is updated inside the same `add_node`/`add_edge` call that
//! mutates the graph, so an index can never lag behind the node and edge
//! stores. Values are kept in insertion order for deterministic traversal.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::model::{Edge, EdgeKind, EdgeProof, Node, NodeId, TypeForm};

#[derive(Debug, Clone, Default)]
struct IndexEntry {
    ordered: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

/// Multimap with insertion-ordered, de-duplicated values
#[derive(Debug, Clone)]
pub struct MultiIndex<K: Eq + Hash> {
    entries: HashMap<K, IndexEntry>,
}

impl<K: Eq + Hash> Default for MultiIndex<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> MultiIndex<K> {
    fn insert(&mut self, key: K, value: NodeId) {
        let entry = self.entries.entry(key).or_default();
        if entry.seen.insert(value.clone()) {
            entry.ordered.push(value);
        }
    }

    pub fn get<Q>(&self, key: &Q) -> &[NodeId]
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries
            .get(key)
            .map(|entry| entry.ordered.as_slice())
            .unwrap_or(&[])
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}

/// Derived indexes over an [`super::ApplicationGraph`]
#[derive(Debug, Clone, Default)]
pub struct GraphIndexes {
    pub(crate) all_types: Vec<NodeId>,
    pub(crate) all_members: Vec<NodeId>,
    pub(crate) by_package: MultiIndex<String>,
    pub(crate) by_form: MultiIndex<TypeForm>,
    pub(crate) by_annotation: MultiIndex<String>,
    pub(crate) declared_members: MultiIndex<NodeId>,
    pub(crate) declaring_type: HashMap<NodeId, NodeId>,
    pub(crate) subtypes: MultiIndex<NodeId>,
    pub(crate) supertypes: MultiIndex<NodeId>,
    pub(crate) implementors: MultiIndex<NodeId>,
    pub(crate) implemented_interfaces: MultiIndex<NodeId>,
    pub(crate) fields_by_type: MultiIndex<NodeId>,
    pub(crate) methods_by_return_type: MultiIndex<NodeId>,
    pub(crate) members_by_parameter_type: MultiIndex<NodeId>,
    pub(crate) used_in_signature_of: MultiIndex<NodeId>,
    pub(crate) signature_types_of: MultiIndex<NodeId>,
    pub(crate) signature_proofs: HashMap<(NodeId, NodeId), Vec<EdgeProof>>,
}

impl GraphIndexes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly added node
    pub(crate) fn on_node_added(&mut self, node: &Node) {
        let id = node.id().clone();
        for annotation in node.annotations() {
            self.by_annotation
                .insert(annotation.qualified_name.clone(), id.clone());
        }

        match node {
            Node::Type(type_node) => {
                self.by_package
                    .insert(type_node.package.clone(), id.clone());
                self.by_form.insert(type_node.form, id.clone());
                self.all_types.push(id);
            }
            Node::Field(_) | Node::Method(_) | Node::Constructor(_) => {
                self.all_members.push(id);
            }
        }
    }

    /// Register a freshly added edge whose endpoints are known to exist
    pub(crate) fn on_edge_added(&mut self, edge: &Edge) {
        let (from, to) = (edge.from.clone(), edge.to.clone());
        match edge.kind {
            EdgeKind::Declares => {
                self.declaring_type.insert(to.clone(), from.clone());
                self.declared_members.insert(from, to);
            }
            EdgeKind::Extends => {
                self.subtypes.insert(to.clone(), from.clone());
                self.supertypes.insert(from, to);
            }
            EdgeKind::Implements => {
                self.implementors.insert(to.clone(), from.clone());
                self.implemented_interfaces.insert(from, to);
            }
            EdgeKind::FieldType => self.fields_by_type.insert(to, from),
            EdgeKind::ReturnType => self.methods_by_return_type.insert(to, from),
            EdgeKind::ParameterType => self.members_by_parameter_type.insert(to, from),
            EdgeKind::UsesInSignature => {
                if let Some(proof) = &edge.proof {
                    let proofs = self
                        .signature_proofs
                        .entry((from.clone(), to.clone()))
                        .or_default();
                    if !proofs.contains(proof) {
                        proofs.push(proof.clone());
                    }
                }
                self.used_in_signature_of.insert(to.clone(), from.clone());
                self.signature_types_of.insert(from, to);
            }
        }
    }

    pub fn all_types(&self) -> &[NodeId] {
        &self.all_types
    }

    pub fn all_members(&self) -> &[NodeId] {
        &self.all_members
    }

    pub fn types_in_package(&self, package: &str) -> &[NodeId] {
        self.by_package.get(package)
    }

    pub fn types_with_form(&self, form: TypeForm) -> &[NodeId] {
        self.by_form.get(&form)
    }

    pub fn annotated_with(&self, annotation: &str) -> &[NodeId] {
        self.by_annotation.get(annotation)
    }

    pub fn declared_members(&self, type_id: &NodeId) -> &[NodeId] {
        self.declared_members.get(type_id)
    }

    pub fn declaring_type(&self, member: &NodeId) -> Option<&NodeId> {
        self.declaring_type.get(member)
    }

    pub fn subtypes(&self, type_id: &NodeId) -> &[NodeId] {
        self.subtypes.get(type_id)
    }

    pub fn supertypes(&self, type_id: &NodeId) -> &[NodeId] {
        self.supertypes.get(type_id)
    }

    pub fn implementors(&self, interface: &NodeId) -> &[NodeId] {
        self.implementors.get(interface)
    }

    pub fn implemented_interfaces(&self, type_id: &NodeId) -> &[NodeId] {
        self.implemented_interfaces.get(type_id)
    }

    pub fn fields_by_type(&self, type_id: &NodeId) -> &[NodeId] {
        self.fields_by_type.get(type_id)
    }

    pub fn methods_by_return_type(&self, type_id: &NodeId) -> &[NodeId] {
        self.methods_by_return_type.get(type_id)
    }

    pub fn members_by_parameter_type(&self, type_id: &NodeId) -> &[NodeId] {
        self.members_by_parameter_type.get(type_id)
    }

    pub fn used_in_signature_of(&self, type_id: &NodeId) -> &[NodeId] {
        self.used_in_signature_of.get(type_id)
    }

    pub fn signature_types_of(&self, interface: &NodeId) -> &[NodeId] {
        self.signature_types_of.get(interface)
    }

    pub fn signature_proofs(&self, interface: &NodeId, used: &NodeId) -> &[EdgeProof] {
        self.signature_proofs
            .get(&(interface.clone(), used.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn package_count(&self) -> usize {
        self.by_package.key_count()
    }
}
