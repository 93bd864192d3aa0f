//! Derives an [`ApplicationGraph`] from a [`SemanticModel`].
//!
//! The build runs in three passes:
//!
//! 1. one [`TypeNode`] per declared type;
//! 2. member nodes with their DECLARES edge plus RAW hierarchy and
//!    type-usage edges toward known types (generic arguments included);
//! 3. DERIVED `USES_IN_SIGNATURE` edges from each interface to the known
//!    types its method signatures mention, each carrying an [`EdgeProof`].

use std::collections::HashSet;
use tracing::info_span;

use super::application_graph::ApplicationGraph;
use super::model::{
    ConstructorNode, Edge, EdgeKind, EdgeProof, FieldNode, GraphMetadata, MethodNode, Node,
    NodeId, Parameter, SignaturePosition, TypeNode, TypeRef,
};
use crate::errors::Result;
use crate::observability::{set_phase, AnalysisPhase};
use crate::semantic::{SemanticModel, SourceParameter, SourceType};

#[derive(Debug, Clone)]
pub struct GraphBuilder {
    compute_derived_edges: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            compute_derived_edges: true,
        }
    }

    /// Skip pass 3; the graph then only holds RAW edges
    pub fn without_derived_edges() -> Self {
        Self {
            compute_derived_edges: false,
        }
    }

    pub fn build(&self, model: &SemanticModel) -> Result<ApplicationGraph> {
        let _phase = set_phase(AnalysisPhase::GraphBuilding);
        let _span = info_span!("graph_building", types = model.types.len()).entered();

        let mut graph = ApplicationGraph::with_metadata(GraphMetadata {
            root_package: model.root_package.clone(),
            language_level: model.language_level.clone(),
            source_count: model.types.len(),
        });

        log::info!("Building graph from {} types", model.types.len());

        let mut known: HashSet<&str> = HashSet::new();
        for source in &model.types {
            graph.add_node(Node::Type(type_node(source)))?;
            known.insert(source.qualified_name.as_str());
        }
        log::debug!("Pass 1 complete: {} type nodes", graph.type_count());

        for source in &model.types {
            add_members_and_edges(&mut graph, source, &known)?;
        }
        log::debug!(
            "Pass 2 complete: {} members, {} edges",
            graph.member_count(),
            graph.edge_count()
        );

        if self.compute_derived_edges {
            let derived = derive_signature_edges(&graph);
            for edge in derived {
                graph.add_edge(edge)?;
            }
            log::debug!("Pass 3 complete: {} total edges", graph.edge_count());
        }

        log::info!(
            "Graph built: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

fn type_node(source: &SourceType) -> TypeNode {
    TypeNode {
        modifiers: source.modifiers.clone(),
        super_type: source.super_type.clone(),
        interfaces: source.interfaces.clone(),
        annotations: source.annotations.clone(),
        location: source.location.clone(),
        ..TypeNode::new(&source.qualified_name, source.form)
    }
}

fn add_members_and_edges(
    graph: &mut ApplicationGraph,
    source: &SourceType,
    known: &HashSet<&str>,
) -> Result<()> {
    let owner = source.qualified_name.as_str();
    let type_id = NodeId::for_type(owner);
    let package = source.package().to_string();

    if let Some(super_type) = &source.super_type {
        if known.contains(super_type.qualified_name.as_str()) {
            graph.add_edge(Edge::raw(
                type_id.clone(),
                NodeId::for_type(&super_type.qualified_name),
                EdgeKind::Extends,
            ))?;
        }
    }
    for interface in &source.interfaces {
        if known.contains(interface.qualified_name.as_str()) {
            graph.add_edge(Edge::raw(
                type_id.clone(),
                NodeId::for_type(&interface.qualified_name),
                EdgeKind::Implements,
            ))?;
        }
    }

    for field in &source.fields {
        let id = NodeId::for_field(owner, &field.name);
        add_member(
            graph,
            &type_id,
            Node::Field(FieldNode {
                id: id.clone(),
                declaring_type: type_id.clone(),
                simple_name: field.name.clone(),
                package: package.clone(),
                field_type: field.field_type.clone(),
                modifiers: field.modifiers.clone(),
                annotations: field.annotations.clone(),
                location: field.location.clone(),
            }),
        )?;
        add_usage_edges(graph, &id, [&field.field_type], EdgeKind::FieldType, known)?;
    }

    for method in &source.methods {
        let id = NodeId::for_method(owner, &method.name, &parameter_type_names(&method.parameters));
        add_member(
            graph,
            &type_id,
            Node::Method(MethodNode {
                id: id.clone(),
                declaring_type: type_id.clone(),
                simple_name: method.name.clone(),
                package: package.clone(),
                return_type: method.return_type.clone(),
                parameters: parameters(&method.parameters),
                modifiers: method.modifiers.clone(),
                annotations: method.annotations.clone(),
                location: method.location.clone(),
            }),
        )?;
        if !method.return_type.is_void() {
            add_usage_edges(graph, &id, [&method.return_type], EdgeKind::ReturnType, known)?;
        }
        add_usage_edges(
            graph,
            &id,
            method.parameters.iter().map(|p| &p.param_type),
            EdgeKind::ParameterType,
            known,
        )?;
    }

    for ctor in &source.constructors {
        let id = NodeId::for_constructor(owner, &parameter_type_names(&ctor.parameters));
        add_member(
            graph,
            &type_id,
            Node::Constructor(ConstructorNode {
                id: id.clone(),
                declaring_type: type_id.clone(),
                simple_name: source.simple_name().to_string(),
                package: package.clone(),
                parameters: parameters(&ctor.parameters),
                modifiers: ctor.modifiers.clone(),
                annotations: ctor.annotations.clone(),
                location: ctor.location.clone(),
            }),
        )?;
        add_usage_edges(
            graph,
            &id,
            ctor.parameters.iter().map(|p| &p.param_type),
            EdgeKind::ParameterType,
            known,
        )?;
    }

    Ok(())
}

fn add_member(graph: &mut ApplicationGraph, owner: &NodeId, member: Node) -> Result<()> {
    let member_id = member.id().clone();
    graph.add_node(member)?;
    graph.add_edge(Edge::raw(owner.clone(), member_id, EdgeKind::Declares))
}

/// One edge per distinct known type mentioned by the references, generic arguments included
fn add_usage_edges<'t>(
    graph: &mut ApplicationGraph,
    member: &NodeId,
    refs: impl IntoIterator<Item = &'t TypeRef>,
    kind: EdgeKind,
    known: &HashSet<&str>,
) -> Result<()> {
    let mut emitted: HashSet<&str> = HashSet::new();
    for type_ref in refs {
        for name in type_ref.all_names() {
            if known.contains(name) && emitted.insert(name) {
                graph.add_edge(Edge::raw(member.clone(), NodeId::for_type(name), kind))?;
            }
        }
    }
    Ok(())
}

fn derive_signature_edges(graph: &ApplicationGraph) -> Vec<Edge> {
    let query = graph.query();
    let mut derived = Vec::new();
    let mut seen: HashSet<(NodeId, NodeId, EdgeProof)> = HashSet::new();

    for interface in query.interfaces() {
        for method in query.methods_of(&interface.id) {
            let positions = std::iter::once((SignaturePosition::Return, &method.return_type)).chain(
                method
                    .parameters
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (SignaturePosition::Parameter(i), &p.param_type)),
            );

            for (position, type_ref) in positions {
                for name in type_ref.all_names() {
                    let used = NodeId::for_type(name);
                    if used == interface.id || !graph.contains(&used) {
                        continue;
                    }
                    let proof = EdgeProof {
                        method: method.id.clone(),
                        position,
                    };
                    if seen.insert((interface.id.clone(), used.clone(), proof.clone())) {
                        derived.push(Edge::uses_in_signature(interface.id.clone(), used, proof));
                    }
                }
            }
        }
    }

    derived
}

fn parameter_type_names(params: &[SourceParameter]) -> Vec<String> {
    params
        .iter()
        .map(|p| p.param_type.qualified_name.clone())
        .collect()
}

fn parameters(params: &[SourceParameter]) -> Vec<Parameter> {
    params
        .iter()
        .map(|p| Parameter {
            name: p.name.clone(),
            param_type: p.param_type.clone(),
            annotations: p.annotations.clone(),
        })
        .collect()
}
