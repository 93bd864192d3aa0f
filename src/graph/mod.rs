//! The semantic graph: node/edge model, append-only store, indexes and query.

pub mod application_graph;
pub mod builder;
pub mod indexes;
pub mod model;
pub mod query;

pub use application_graph::ApplicationGraph;
pub use builder::GraphBuilder;
pub use indexes::GraphIndexes;
pub use model::{
    package_of, simple_name_of, AnnotationRef, ConstructorNode, Edge, EdgeKind, EdgeProof,
    FieldNode, GraphMetadata, MethodNode, Modifier, Node, NodeId, NodeKind, Parameter,
    Provenance, SignaturePosition, SourceLocation, TypeForm, TypeNode, TypeRef,
};
pub use query::GraphQuery;
