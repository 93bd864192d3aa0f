//! Criteria for data carried across ports: commands, queries and DTOs.
//!
//! The classifier only applies this family to non-interface types that
//! already appear in some interface signature.

use crate::classification::criterion::{Criterion, PRIORITY_STRONG, PRIORITY_WEAK};
use crate::classification::evidence::{ConfidenceLevel, Evidence, MatchResult};
use crate::classification::kinds::{ModelKind, RoleKind};
use crate::graph::{GraphQuery, TypeNode};

use super::support::names;

pub struct ModelNamingCriterion {
    name: &'static str,
    suffixes: &'static [&'static str],
    kind: ModelKind,
    priority: u32,
    confidence: ConfidenceLevel,
}

impl ModelNamingCriterion {
    pub fn command() -> Self {
        Self {
            name: "naming-command-model",
            suffixes: &["Command"],
            kind: ModelKind::CommandModel,
            priority: PRIORITY_STRONG,
            confidence: ConfidenceLevel::High,
        }
    }

    pub fn query() -> Self {
        Self {
            name: "naming-query-model",
            suffixes: &["Query"],
            kind: ModelKind::QueryModel,
            priority: PRIORITY_STRONG,
            confidence: ConfidenceLevel::High,
        }
    }

    pub fn dto() -> Self {
        Self {
            name: "naming-dto",
            suffixes: &["Request", "Response", "Dto", "DTO", "View"],
            kind: ModelKind::Dto,
            priority: PRIORITY_WEAK,
            confidence: ConfidenceLevel::Medium,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::command(), Self::query(), Self::dto()]
    }
}

impl Criterion for ModelNamingCriterion {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn target_kind(&self) -> RoleKind {
        self.kind.into()
    }

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult> {
        if node.is_interface() {
            return Ok(MatchResult::no_match());
        }
        let Some(suffix) = self
            .suffixes
            .iter()
            .find(|suffix| node.simple_name.ends_with(*suffix))
        else {
            return Ok(MatchResult::no_match());
        };

        let ports = query.interfaces_using_in_signature(&node.id);
        let mut evidence = vec![Evidence::naming(format!("Name ends with '{suffix}'"))];
        if !ports.is_empty() {
            evidence.push(Evidence::relationship(
                format!("Exchanged through {}", names(&ports)),
                ports.iter().map(|p| p.id.clone()).collect(),
            ));
        }
        Ok(MatchResult::matched(
            self.confidence,
            format!("{} named '*{}'", node.simple_name, suffix),
            evidence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, NodeId, TypeForm, TypeRef};
    use crate::semantic::{SemanticModel, SourceMethod, SourceType};

    #[test]
    fn test_model_suffixes() {
        let graph = GraphBuilder::new()
            .build(&SemanticModel {
                types: vec![
                    SourceType::new("shop.PlaceOrderCommand", TypeForm::Record),
                    SourceType::new("shop.OrderResponse", TypeForm::Record),
                    SourceType::new("shop.PlaceOrderUseCase", TypeForm::Interface).with_method(
                        SourceMethod::new("place", TypeRef::new("shop.OrderResponse"))
                            .with_parameter("command", TypeRef::new("shop.PlaceOrderCommand")),
                    ),
                ],
                ..Default::default()
            })
            .unwrap();
        let query = graph.query();
        let node = |name: &str| query.type_node(&NodeId::for_type(name)).unwrap();

        let command = ModelNamingCriterion::command()
            .evaluate(node("shop.PlaceOrderCommand"), &query)
            .unwrap();
        assert_eq!(command.confidence(), Some(ConfidenceLevel::High));

        let dto = ModelNamingCriterion::dto()
            .evaluate(node("shop.OrderResponse"), &query)
            .unwrap();
        assert_eq!(dto.confidence(), Some(ConfidenceLevel::Medium));

        assert!(!ModelNamingCriterion::query()
            .evaluate(node("shop.PlaceOrderCommand"), &query)
            .unwrap()
            .is_match());
    }
}
