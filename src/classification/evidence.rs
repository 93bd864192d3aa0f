use serde::{Deserialize, Serialize};
use std::fmt;

use crate::graph::NodeId;

/// Strength of a single criterion match.
///
/// Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceType {
    Annotation,
    Relationship,
    ExplicitConfig,
    Naming,
    Structure,
    Diagnostic,
}

/// Human-readable justification attached to a match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(rename = "type")]
    pub evidence_type: EvidenceType,
    pub description: String,
    pub related_nodes: Vec<NodeId>,
}

impl Evidence {
    pub fn new(evidence_type: EvidenceType, description: impl Into<String>) -> Self {
        Self {
            evidence_type,
            description: description.into(),
            related_nodes: Vec::new(),
        }
    }

    pub fn annotation(description: impl Into<String>) -> Self {
        Self::new(EvidenceType::Annotation, description)
    }

    pub fn relationship(description: impl Into<String>, related: Vec<NodeId>) -> Self {
        Self {
            related_nodes: related,
            ..Self::new(EvidenceType::Relationship, description)
        }
    }

    pub fn naming(description: impl Into<String>) -> Self {
        Self::new(EvidenceType::Naming, description)
    }

    pub fn structure(description: impl Into<String>) -> Self {
        Self::new(EvidenceType::Structure, description)
    }

    pub fn explicit_config(description: impl Into<String>) -> Self {
        Self::new(EvidenceType::ExplicitConfig, description)
    }

    pub fn diagnostic(description: impl Into<String>) -> Self {
        Self::new(EvidenceType::Diagnostic, description)
    }
}

/// Outcome of evaluating one criterion against one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    NoMatch,
    Match {
        confidence: ConfidenceLevel,
        justification: String,
        evidence: Vec<Evidence>,
    },
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self::NoMatch
    }

    pub fn matched(
        confidence: ConfidenceLevel,
        justification: impl Into<String>,
        evidence: Vec<Evidence>,
    ) -> Self {
        Self::Match {
            confidence,
            justification: justification.into(),
            evidence,
        }
    }

    pub fn high(justification: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self::matched(ConfidenceLevel::High, justification, evidence)
    }

    pub fn medium(justification: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self::matched(ConfidenceLevel::Medium, justification, evidence)
    }

    pub fn low(justification: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self::matched(ConfidenceLevel::Low, justification, evidence)
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }

    pub fn confidence(&self) -> Option<ConfidenceLevel> {
        match self {
            Self::Match { confidence, .. } => Some(*confidence),
            Self::NoMatch => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_ordering() {
        assert!(ConfidenceLevel::High > ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium > ConfidenceLevel::Low);
        let mut levels = vec![ConfidenceLevel::Low, ConfidenceLevel::High, ConfidenceLevel::Medium];
        levels.sort();
        assert_eq!(
            levels,
            vec![ConfidenceLevel::Low, ConfidenceLevel::Medium, ConfidenceLevel::High]
        );
    }

    #[test]
    fn test_match_result_accessors() {
        let m = MatchResult::medium("named like a repository", vec![Evidence::naming("suffix")]);
        assert!(m.is_match());
        assert_eq!(m.confidence(), Some(ConfidenceLevel::Medium));
        assert_eq!(MatchResult::no_match().confidence(), None);
    }
}
