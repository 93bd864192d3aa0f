//! Layer assignment for the layering constraint.
//!
//! Annotations are checked first, then package segments, then name
//! suffixes; the first hint found decides.

use serde::Serialize;

use crate::graph::TypeNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Layer {
    Presentation,
    Application,
    Domain,
    Infrastructure,
    Unknown,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presentation => "PRESENTATION",
            Self::Application => "APPLICATION",
            Self::Domain => "DOMAIN",
            Self::Infrastructure => "INFRASTRUCTURE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

const PRESENTATION_ANNOTATIONS: &[&str] = &[
    "org.springframework.web.bind.annotation.RestController",
    "org.springframework.stereotype.Controller",
    "javax.ws.rs.Path",
    "jakarta.ws.rs.Path",
];

const APPLICATION_ANNOTATIONS: &[&str] = &["org.springframework.stereotype.Service"];

const INFRASTRUCTURE_ANNOTATIONS: &[&str] = &[
    "org.springframework.stereotype.Repository",
    "javax.persistence.Entity",
    "jakarta.persistence.Entity",
    "org.springframework.context.annotation.Configuration",
];

const PACKAGE_SEGMENTS: &[(&str, Layer)] = &[
    ("presentation", Layer::Presentation),
    ("ui", Layer::Presentation),
    ("web", Layer::Presentation),
    ("rest", Layer::Presentation),
    ("application", Layer::Application),
    ("domain", Layer::Domain),
    ("model", Layer::Domain),
    ("infrastructure", Layer::Infrastructure),
    ("persistence", Layer::Infrastructure),
];

const NAME_SUFFIXES: &[(&str, Layer)] = &[
    ("Controller", Layer::Presentation),
    ("Resolver", Layer::Presentation),
    ("Service", Layer::Application),
    ("UseCase", Layer::Application),
    ("Entity", Layer::Domain),
    ("ValueObject", Layer::Domain),
    ("Repository", Layer::Infrastructure),
    ("Adapter", Layer::Infrastructure),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct LayerClassifier;

impl LayerClassifier {
    pub fn classify(&self, node: &TypeNode) -> Layer {
        let names: Vec<&str> = node
            .annotations
            .iter()
            .map(|a| a.qualified_name.as_str())
            .collect();
        self.classify_names(&node.package, &node.simple_name, &names)
    }

    pub fn classify_names(&self, package: &str, simple_name: &str, annotations: &[&str]) -> Layer {
        layer_from_annotations(annotations)
            .or_else(|| layer_from_package(package))
            .or_else(|| layer_from_name(simple_name))
            .unwrap_or(Layer::Unknown)
    }
}

fn layer_from_annotations(annotations: &[&str]) -> Option<Layer> {
    let has = |set: &[&str]| annotations.iter().any(|a| set.contains(a));
    if has(PRESENTATION_ANNOTATIONS) {
        Some(Layer::Presentation)
    } else if has(INFRASTRUCTURE_ANNOTATIONS) {
        Some(Layer::Infrastructure)
    } else if has(APPLICATION_ANNOTATIONS) {
        Some(Layer::Application)
    } else {
        None
    }
}

fn layer_from_package(package: &str) -> Option<Layer> {
    package.split('.').find_map(|segment| {
        PACKAGE_SEGMENTS
            .iter()
            .find(|(name, _)| *name == segment)
            .map(|(_, layer)| *layer)
    })
}

fn layer_from_name(simple_name: &str) -> Option<Layer> {
    NAME_SUFFIXES
        .iter()
        .find(|(suffix, _)| simple_name.ends_with(suffix))
        .map(|(_, layer)| *layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(package: &str, name: &str, annotations: &[&str]) -> Layer {
        LayerClassifier.classify_names(package, name, annotations)
    }

    #[test]
    fn test_annotation_hints() {
        assert_eq!(
            classify(
                "com.example",
                "OrderController",
                &["org.springframework.web.bind.annotation.RestController"]
            ),
            Layer::Presentation
        );
        assert_eq!(
            classify("com.example", "Orders", &["org.springframework.stereotype.Service"]),
            Layer::Application
        );
    }

    #[test]
    fn test_package_and_suffix_hints() {
        assert_eq!(classify("com.example.ui", "CustomerView", &[]), Layer::Presentation);
        assert_eq!(
            classify("com.example.application", "CreateOrderHandler", &[]),
            Layer::Application
        );
        assert_eq!(classify("com.example.graphql", "OrderResolver", &[]), Layer::Presentation);
        assert_eq!(classify("com.example", "OrderRepository", &[]), Layer::Infrastructure);
        assert_eq!(classify("com.example", "StringUtils", &[]), Layer::Unknown);
    }

    #[test]
    fn test_annotation_beats_package_beats_suffix() {
        assert_eq!(
            classify(
                "com.example.presentation",
                "OrderStore",
                &["org.springframework.stereotype.Repository"]
            ),
            Layer::Infrastructure
        );
        assert_eq!(
            classify("com.example.presentation", "OrderService", &[]),
            Layer::Presentation
        );
    }
}
