//! Externally produced semantic model consumed by the graph builder.
//!
//! A frontend (outside this crate) parses source code and emits these
//! declarations, typically as JSON. Nothing here performs analysis.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{Error, Result};
use crate::graph::{
    package_of, simple_name_of, AnnotationRef, Modifier, SourceLocation, TypeForm, TypeRef,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticModel {
    #[serde(default)]
    pub root_package: Option<String>,
    #[serde(default)]
    pub language_level: Option<String>,
    #[serde(default)]
    pub types: Vec<SourceType>,
}

impl SemanticModel {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::file_system(path, e))?;
        let model = Self::from_json(&contents)?;
        log::debug!(
            "Loaded semantic model with {} types from {}",
            model.types.len(),
            path.display()
        );
        Ok(model)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceType {
    pub qualified_name: String,
    pub form: TypeForm,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
    #[serde(default)]
    pub super_type: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub fields: Vec<SourceField>,
    #[serde(default)]
    pub methods: Vec<SourceMethod>,
    #[serde(default)]
    pub constructors: Vec<SourceConstructor>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl SourceType {
    pub fn new(qualified_name: impl Into<String>, form: TypeForm) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            form,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            super_type: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            location: None,
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.qualified_name)
    }

    pub fn package(&self) -> &str {
        package_of(&self.qualified_name)
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(AnnotationRef::new(annotation));
        self
    }

    pub fn extending(mut self, super_type: &str) -> Self {
        self.super_type = Some(TypeRef::new(super_type));
        self
    }

    pub fn implementing(mut self, interface: &str) -> Self {
        self.interfaces.push(TypeRef::new(interface));
        self
    }

    pub fn with_field(mut self, field: SourceField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: SourceMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, constructor: SourceConstructor) -> Self {
        self.constructors.push(constructor);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl SourceField {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            location: None,
        }
    }

    /// Private final field, the usual shape of an injected dependency
    pub fn private_final(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            modifiers: vec![Modifier::Private, Modifier::Final],
            ..Self::new(name, field_type)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: TypeRef,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
}

impl SourceParameter {
    pub fn new(name: impl Into<String>, param_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            param_type,
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMethod {
    pub name: String,
    pub return_type: TypeRef,
    #[serde(default)]
    pub parameters: Vec<SourceParameter>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl SourceMethod {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters: Vec::new(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            location: None,
        }
    }

    pub fn with_parameter(mut self, name: &str, param_type: TypeRef) -> Self {
        self.parameters.push(SourceParameter::new(name, param_type));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConstructor {
    #[serde(default)]
    pub parameters: Vec<SourceParameter>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRef>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl SourceConstructor {
    pub fn new(parameters: Vec<SourceParameter>) -> Self {
        Self {
            parameters,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            location: None,
        }
    }
}
