//! Node and edge value types for the application graph.
//!
//! Nodes never reference each other directly. Every relationship is an
//! [`Edge`] keyed by [`NodeId`] and resolved through the graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable, value-equal identifier of a type or member.
///
/// The textual form encodes the node kind as a prefix:
///
/// ```
/// use archlens::graph::NodeId;
///
/// assert_eq!(NodeId::for_type("com.acme.Order").as_str(), "type:com.acme.Order");
/// assert_eq!(
///     NodeId::for_method("com.acme.Order", "ship", &["java.lang.String".to_string()]).as_str(),
///     "method:com.acme.Order#ship(java.lang.String)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn for_type(qualified_name: &str) -> Self {
        Self(format!("type:{qualified_name}"))
    }

    pub fn for_field(declaring_type: &str, name: &str) -> Self {
        Self(format!("field:{declaring_type}#{name}"))
    }

    pub fn for_method(declaring_type: &str, name: &str, parameter_types: &[String]) -> Self {
        Self(format!(
            "method:{declaring_type}#{name}({})",
            parameter_types.join(",")
        ))
    }

    pub fn for_constructor(declaring_type: &str, parameter_types: &[String]) -> Self {
        Self(format!(
            "ctor:{declaring_type}#<init>({})",
            parameter_types.join(",")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Node kind encoded in the id prefix
    pub fn kind(&self) -> Option<NodeKind> {
        let (prefix, _) = self.0.split_once(':')?;
        match prefix {
            "type" => Some(NodeKind::Type),
            "field" => Some(NodeKind::Field),
            "method" => Some(NodeKind::Method),
            "ctor" => Some(NodeKind::Constructor),
            _ => None,
        }
    }

    /// The id without its kind prefix
    pub fn value(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, rest)| rest)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Type,
    Field,
    Method,
    Constructor,
}

/// Declaration form of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeForm {
    Class,
    Interface,
    Record,
    Enum,
    Annotation,
}

impl TypeForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "CLASS",
            Self::Interface => "INTERFACE",
            Self::Record => "RECORD",
            Self::Enum => "ENUM",
            Self::Annotation => "ANNOTATION",
        }
    }
}

impl fmt::Display for TypeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Default,
    Sealed,
}

/// Reference to a (possibly generic) type by qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub qualified_name: String,
    #[serde(default)]
    pub arguments: Vec<TypeRef>,
}

impl TypeRef {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn generic(qualified_name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            arguments,
        }
    }

    pub fn void() -> Self {
        Self::new("void")
    }

    pub fn is_void(&self) -> bool {
        self.qualified_name == "void"
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.qualified_name)
    }

    /// This reference and every nested type argument, outermost first
    pub fn all_names(&self) -> Vec<&str> {
        let mut names = vec![self.qualified_name.as_str()];
        for arg in &self.arguments {
            names.extend(arg.all_names());
        }
        names
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name)?;
        if !self.arguments.is_empty() {
            let args: Vec<String> = self.arguments.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// Annotation attached to a node, with its attribute values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationRef {
    pub qualified_name: String,
    pub simple_name: String,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl AnnotationRef {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let simple_name = simple_name_of(&qualified_name).to_string();
        Self {
            qualified_name,
            simple_name,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Marker annotation from the jMolecules domain-modeling vocabulary
    pub fn is_domain_marker(&self) -> bool {
        self.qualified_name.starts_with("org.jmolecules.ddd.annotation.")
            || self.qualified_name.starts_with("org.jmolecules.event.annotation.")
    }

    /// Marker annotation from the jMolecules hexagonal vocabulary
    pub fn is_port_marker(&self) -> bool {
        self.qualified_name
            .starts_with("org.jmolecules.architecture.hexagonal.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNode {
    pub id: NodeId,
    pub qualified_name: String,
    pub simple_name: String,
    pub package: String,
    pub form: TypeForm,
    pub modifiers: Vec<Modifier>,
    pub super_type: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub annotations: Vec<AnnotationRef>,
    pub location: Option<SourceLocation>,
}

impl TypeNode {
    /// Minimal type node; remaining attributes are set with the `with_*` methods
    pub fn new(qualified_name: &str, form: TypeForm) -> Self {
        Self {
            id: NodeId::for_type(qualified_name),
            qualified_name: qualified_name.to_string(),
            simple_name: simple_name_of(qualified_name).to_string(),
            package: package_of(qualified_name).to_string(),
            form,
            modifiers: Vec::new(),
            super_type: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            location: None,
        }
    }

    pub fn with_annotation(mut self, annotation: AnnotationRef) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_super_type(mut self, super_type: TypeRef) -> Self {
        self.super_type = Some(super_type);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_interface(&self) -> bool {
        self.form == TypeForm::Interface
    }

    pub fn is_record(&self) -> bool {
        self.form == TypeForm::Record
    }

    pub fn has_annotation(&self, qualified_name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.qualified_name == qualified_name)
    }

    /// Whether the type lists `qualified_name` as a directly implemented interface
    pub fn declares_interface(&self, qualified_name: &str) -> bool {
        self.interfaces
            .iter()
            .any(|i| i.qualified_name == qualified_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNode {
    pub id: NodeId,
    pub declaring_type: NodeId,
    pub simple_name: String,
    pub package: String,
    pub field_type: TypeRef,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
    pub location: Option<SourceLocation>,
}

impl FieldNode {
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: TypeRef,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodNode {
    pub id: NodeId,
    pub declaring_type: NodeId,
    pub simple_name: String,
    pub package: String,
    pub return_type: TypeRef,
    pub parameters: Vec<Parameter>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
    pub location: Option<SourceLocation>,
}

impl MethodNode {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    /// `setX(value)` style mutator
    pub fn is_setter(&self) -> bool {
        self.simple_name.len() > 3
            && self.simple_name.starts_with("set")
            && self.simple_name[3..].starts_with(|c: char| c.is_ascii_uppercase())
            && self.parameters.len() == 1
    }

    /// Every type referenced by the signature: the return type first, then parameters
    pub fn signature_types(&self) -> impl Iterator<Item = &TypeRef> {
        std::iter::once(&self.return_type).chain(self.parameters.iter().map(|p| &p.param_type))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorNode {
    pub id: NodeId,
    pub declaring_type: NodeId,
    pub simple_name: String,
    pub package: String,
    pub parameters: Vec<Parameter>,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<AnnotationRef>,
    pub location: Option<SourceLocation>,
}

/// Closed set of node variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Node {
    Type(TypeNode),
    Field(FieldNode),
    Method(MethodNode),
    Constructor(ConstructorNode),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Type(n) => &n.id,
            Node::Field(n) => &n.id,
            Node::Method(n) => &n.id,
            Node::Constructor(n) => &n.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Type(_) => NodeKind::Type,
            Node::Field(_) => NodeKind::Field,
            Node::Method(_) => NodeKind::Method,
            Node::Constructor(_) => NodeKind::Constructor,
        }
    }

    pub fn simple_name(&self) -> &str {
        match self {
            Node::Type(n) => &n.simple_name,
            Node::Field(n) => &n.simple_name,
            Node::Method(n) => &n.simple_name,
            Node::Constructor(n) => &n.simple_name,
        }
    }

    /// Qualified name; members are qualified by their declaring type
    pub fn qualified_name(&self) -> &str {
        match self {
            Node::Type(n) => &n.qualified_name,
            other => other.id().value(),
        }
    }

    pub fn package(&self) -> &str {
        match self {
            Node::Type(n) => &n.package,
            Node::Field(n) => &n.package,
            Node::Method(n) => &n.package,
            Node::Constructor(n) => &n.package,
        }
    }

    pub fn annotations(&self) -> &[AnnotationRef] {
        match self {
            Node::Type(n) => &n.annotations,
            Node::Field(n) => &n.annotations,
            Node::Method(n) => &n.annotations,
            Node::Constructor(n) => &n.annotations,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Node::Type(n) => n.location.as_ref(),
            Node::Field(n) => n.location.as_ref(),
            Node::Method(n) => n.location.as_ref(),
            Node::Constructor(n) => n.location.as_ref(),
        }
    }

    /// Declaring type of a member node; `None` for types
    pub fn declaring_type(&self) -> Option<&NodeId> {
        match self {
            Node::Type(_) => None,
            Node::Field(n) => Some(&n.declaring_type),
            Node::Method(n) => Some(&n.declaring_type),
            Node::Constructor(n) => Some(&n.declaring_type),
        }
    }

    pub fn as_type(&self) -> Option<&TypeNode> {
        match self {
            Node::Type(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldNode> {
        match self {
            Node::Field(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodNode> {
        match self {
            Node::Method(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_constructor(&self) -> Option<&ConstructorNode> {
        match self {
            Node::Constructor(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_member(&self) -> bool {
        !matches!(self, Node::Type(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    Declares,
    Extends,
    Implements,
    FieldType,
    ReturnType,
    ParameterType,
    UsesInSignature,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 7] = [
        EdgeKind::Declares,
        EdgeKind::Extends,
        EdgeKind::Implements,
        EdgeKind::FieldType,
        EdgeKind::ReturnType,
        EdgeKind::ParameterType,
        EdgeKind::UsesInSignature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declares => "DECLARES",
            Self::Extends => "EXTENDS",
            Self::Implements => "IMPLEMENTS",
            Self::FieldType => "FIELD_TYPE",
            Self::ReturnType => "RETURN_TYPE",
            Self::ParameterType => "PARAMETER_TYPE",
            Self::UsesInSignature => "USES_IN_SIGNATURE",
        }
    }

    /// Edge kinds expressing that a member's signature depends on a type
    pub fn is_type_usage(&self) -> bool {
        matches!(
            self,
            Self::FieldType | Self::ReturnType | Self::ParameterType
        )
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
    /// Produced directly from the semantic model
    Raw,
    /// Computed from other edges
    Derived,
}

/// Where in a method signature a type was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignaturePosition {
    Return,
    Parameter(usize),
}

/// Justification for a derived signature-usage edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeProof {
    pub method: NodeId,
    pub position: SignaturePosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
    pub provenance: Provenance,
    pub proof: Option<EdgeProof>,
}

impl Edge {
    pub fn raw(from: NodeId, to: NodeId, kind: EdgeKind) -> Self {
        Self {
            from,
            to,
            kind,
            provenance: Provenance::Raw,
            proof: None,
        }
    }

    pub fn derived(from: NodeId, to: NodeId, kind: EdgeKind, proof: Option<EdgeProof>) -> Self {
        Self {
            from,
            to,
            kind,
            provenance: Provenance::Derived,
            proof,
        }
    }

    pub fn uses_in_signature(interface: NodeId, used: NodeId, proof: EdgeProof) -> Self {
        Self::derived(interface, used, EdgeKind::UsesInSignature, Some(proof))
    }

    pub fn is_derived(&self) -> bool {
        self.provenance == Provenance::Derived
    }
}

/// Run-level information about the analysed application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub root_package: Option<String>,
    pub language_level: Option<String>,
    pub source_count: usize,
}

/// Last dotted segment of a qualified name
pub fn simple_name_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or(qualified_name, |(_, simple)| simple)
}

/// Everything before the last dot of a qualified name
pub fn package_of(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once('.')
        .map_or("", |(package, _)| package)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_kind_round_trips_through_prefix() {
        assert_eq!(NodeId::for_type("a.B").kind(), Some(NodeKind::Type));
        assert_eq!(NodeId::for_field("a.B", "x").kind(), Some(NodeKind::Field));
        assert_eq!(
            NodeId::for_method("a.B", "m", &[]).kind(),
            Some(NodeKind::Method)
        );
        assert_eq!(
            NodeId::for_constructor("a.B", &["int".into()]).as_str(),
            "ctor:a.B#<init>(int)"
        );
        assert_eq!(NodeId::for_field("a.B", "x").value(), "a.B#x");
    }

    #[test]
    fn test_type_ref_collects_nested_arguments() {
        let map = TypeRef::generic(
            "java.util.Map",
            vec![
                TypeRef::new("java.lang.String"),
                TypeRef::generic("java.util.List", vec![TypeRef::new("com.acme.Order")]),
            ],
        );
        assert_eq!(
            map.all_names(),
            vec![
                "java.util.Map",
                "java.lang.String",
                "java.util.List",
                "com.acme.Order"
            ]
        );
        assert_eq!(
            map.to_string(),
            "java.util.Map<java.lang.String, java.util.List<com.acme.Order>>"
        );
    }

    #[test]
    fn test_setter_detection() {
        let method = |name: &str, params: usize| MethodNode {
            id: NodeId::for_method("a.B", name, &[]),
            declaring_type: NodeId::for_type("a.B"),
            simple_name: name.to_string(),
            package: "a".into(),
            return_type: TypeRef::void(),
            parameters: (0..params)
                .map(|i| Parameter {
                    name: format!("p{i}"),
                    param_type: TypeRef::new("int"),
                    annotations: vec![],
                })
                .collect(),
            modifiers: vec![],
            annotations: vec![],
            location: None,
        };
        assert!(method("setAmount", 1).is_setter());
        assert!(!method("settle", 1).is_setter());
        assert!(!method("setAmount", 2).is_setter());
        assert!(!method("set", 1).is_setter());
    }

    #[test]
    fn test_annotation_vocabulary_predicates() {
        assert!(AnnotationRef::new("org.jmolecules.ddd.annotation.AggregateRoot").is_domain_marker());
        assert!(AnnotationRef::new("org.jmolecules.architecture.hexagonal.PrimaryPort").is_port_marker());
        assert!(!AnnotationRef::new("jakarta.persistence.Entity").is_domain_marker());
        assert_eq!(
            AnnotationRef::new("jakarta.persistence.Entity").simple_name,
            "Entity"
        );
    }
}
