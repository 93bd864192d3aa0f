use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::engine::{Contribution, Decision};
use super::evidence::{ConfidenceLevel, Evidence, EvidenceType};
use super::kinds::{ClassificationTarget, PortDirection, RoleKind};
use crate::config::ValidationPolicy;
use crate::graph::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationStatus {
    Classified,
    /// Carries a structural signal, yet no criterion matched
    Unclassified,
    /// Top-ranked matches assign incompatible kinds
    Conflict,
    /// No structural signal at all
    NotAnalyzed,
}

impl ClassificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classified => "CLASSIFIED",
            Self::Unclassified => "UNCLASSIFIED",
            Self::Conflict => "CONFLICT",
            Self::NotAnalyzed => "NOT_ANALYZED",
        }
    }
}

impl fmt::Display for ClassificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictSeverity {
    Warning,
    Error,
}

/// A match that did not win, kept for review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: RoleKind,
    pub criterion: String,
    pub priority: u32,
    pub confidence: ConfidenceLevel,
    pub justification: String,
    pub severity: ConflictSeverity,
}

impl Conflict {
    fn from_contribution(contribution: &Contribution, severity: ConflictSeverity) -> Self {
        Self {
            kind: contribution.kind,
            criterion: contribution.criterion.clone(),
            priority: contribution.priority,
            confidence: contribution.confidence,
            justification: contribution.justification.clone(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub node_id: NodeId,
    pub status: ClassificationStatus,
    pub target: Option<ClassificationTarget>,
    pub kind: Option<RoleKind>,
    pub confidence: Option<ConfidenceLevel>,
    pub priority: Option<u32>,
    pub criterion: Option<String>,
    pub justification: Option<String>,
    pub evidence: Vec<Evidence>,
    pub conflicts: Vec<Conflict>,
    pub port_direction: Option<PortDirection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Evidence>,
}

impl ClassificationResult {
    fn empty(
        node_id: NodeId,
        status: ClassificationStatus,
        target: Option<ClassificationTarget>,
    ) -> Self {
        Self {
            node_id,
            status,
            target,
            kind: None,
            confidence: None,
            priority: None,
            criterion: None,
            justification: None,
            evidence: Vec::new(),
            conflicts: Vec::new(),
            port_direction: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn classified(node_id: NodeId, winner: Contribution, others: &[Contribution]) -> Self {
        let conflicts = others
            .iter()
            .filter(|other| other.kind != winner.kind)
            .map(|other| {
                let severity = if other.kind.is_compatible_with(&winner.kind) {
                    ConflictSeverity::Warning
                } else {
                    ConflictSeverity::Error
                };
                Conflict::from_contribution(other, severity)
            })
            .collect();

        Self {
            target: Some(winner.kind.target()),
            kind: Some(winner.kind),
            confidence: Some(winner.confidence),
            priority: Some(winner.priority),
            criterion: Some(winner.criterion),
            justification: Some(winner.justification),
            evidence: winner.evidence,
            conflicts,
            port_direction: winner.kind.port_direction(),
            ..Self::empty(node_id, ClassificationStatus::Classified, None)
        }
    }

    /// Every tied match is kept both as evidence and as a conflict entry
    pub fn conflict(
        node_id: NodeId,
        target: ClassificationTarget,
        tied: &[Contribution],
        others: &[Contribution],
    ) -> Self {
        let evidence = tied
            .iter()
            .flat_map(|c| {
                let summary = Evidence::new(
                    EvidenceType::Diagnostic,
                    format!(
                        "{} proposed {} ({}, priority {}): {}",
                        c.criterion, c.kind, c.confidence, c.priority, c.justification
                    ),
                );
                std::iter::once(summary).chain(c.evidence.iter().cloned())
            })
            .collect();

        let conflicts = tied
            .iter()
            .map(|c| Conflict::from_contribution(c, ConflictSeverity::Error))
            .chain(
                others
                    .iter()
                    .map(|c| Conflict::from_contribution(c, ConflictSeverity::Warning)),
            )
            .collect();

        Self {
            evidence,
            conflicts,
            ..Self::empty(node_id, ClassificationStatus::Conflict, Some(target))
        }
    }

    pub fn unclassified(node_id: NodeId, target: ClassificationTarget) -> Self {
        Self::empty(node_id, ClassificationStatus::Unclassified, Some(target))
    }

    pub fn not_analyzed(node_id: NodeId, target: ClassificationTarget) -> Self {
        Self::empty(node_id, ClassificationStatus::NotAnalyzed, Some(target))
    }

    /// Build a result from an arbitration decision; `Empty` maps to UNCLASSIFIED
    /// when the node has a structural signal and NOT_ANALYZED otherwise.
    ///
    /// `target` is the node's primary family, recorded on every outcome that
    /// has no winner to take it from.
    pub fn from_decision(
        node_id: NodeId,
        target: ClassificationTarget,
        decision: Decision,
        has_signal: bool,
    ) -> Self {
        match decision {
            Decision::Winner { winner, others } => Self::classified(node_id, winner, &others),
            Decision::Conflict { tied, others } => Self::conflict(node_id, target, &tied, &others),
            Decision::Empty if has_signal => Self::unclassified(node_id, target),
            Decision::Empty => Self::not_analyzed(node_id, target),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<Evidence>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn is_classified(&self) -> bool {
        self.status == ClassificationStatus::Classified
    }

    pub fn has_kind(&self, kind: RoleKind) -> bool {
        self.kind == Some(kind)
    }
}

/// Results keyed by node id, in graph type order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassificationResults {
    results: Vec<ClassificationResult>,
    #[serde(skip)]
    positions: HashMap<NodeId, usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub total: usize,
    pub classified: usize,
    pub unclassified: usize,
    pub conflicts: usize,
    pub not_analyzed: usize,
    pub domain: usize,
    pub ports: usize,
    pub models: usize,
}

impl ClassificationResults {
    pub fn new(results: Vec<ClassificationResult>) -> Self {
        let positions = results
            .iter()
            .enumerate()
            .map(|(i, r)| (r.node_id.clone(), i))
            .collect();
        Self { results, positions }
    }

    pub fn get(&self, id: &NodeId) -> Option<&ClassificationResult> {
        self.positions.get(id).map(|&i| &self.results[i])
    }

    pub fn kind_of(&self, id: &NodeId) -> Option<RoleKind> {
        self.get(id).and_then(|r| r.kind)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.results.iter()
    }

    fn classified_for(&self, target: ClassificationTarget) -> Vec<&ClassificationResult> {
        self.results
            .iter()
            .filter(|r| r.is_classified() && r.target == Some(target))
            .collect()
    }

    pub fn domain_classifications(&self) -> Vec<&ClassificationResult> {
        self.classified_for(ClassificationTarget::Domain)
    }

    pub fn port_classifications(&self) -> Vec<&ClassificationResult> {
        self.classified_for(ClassificationTarget::Port)
    }

    pub fn model_classifications(&self) -> Vec<&ClassificationResult> {
        self.classified_for(ClassificationTarget::Model)
    }

    fn with_status(&self, status: ClassificationStatus) -> Vec<&ClassificationResult> {
        self.results.iter().filter(|r| r.status == status).collect()
    }

    pub fn classified_results(&self) -> Vec<&ClassificationResult> {
        self.with_status(ClassificationStatus::Classified)
    }

    pub fn conflicts(&self) -> Vec<&ClassificationResult> {
        self.with_status(ClassificationStatus::Conflict)
    }

    pub fn unclassified(&self) -> Vec<&ClassificationResult> {
        self.with_status(ClassificationStatus::Unclassified)
    }

    pub fn not_analyzed(&self) -> Vec<&ClassificationResult> {
        self.with_status(ClassificationStatus::NotAnalyzed)
    }

    /// Classified results carrying exactly `kind`
    pub fn of_kind(&self, kind: RoleKind) -> Vec<&ClassificationResult> {
        self.results.iter().filter(|r| r.has_kind(kind)).collect()
    }

    pub fn summary(&self) -> ClassificationSummary {
        self.results
            .iter()
            .fold(ClassificationSummary::default(), |mut acc, r| {
                acc.total += 1;
                match r.status {
                    ClassificationStatus::Classified => acc.classified += 1,
                    ClassificationStatus::Unclassified => acc.unclassified += 1,
                    ClassificationStatus::Conflict => acc.conflicts += 1,
                    ClassificationStatus::NotAnalyzed => acc.not_analyzed += 1,
                }
                match r.target {
                    Some(ClassificationTarget::Domain) => acc.domain += 1,
                    Some(ClassificationTarget::Port) => acc.ports += 1,
                    Some(ClassificationTarget::Model) => acc.models += 1,
                    None => {}
                }
                acc
            })
    }

    /// Results the policy treats as failures
    pub fn policy_failures(&self, policy: &ValidationPolicy) -> Vec<&ClassificationResult> {
        self.results
            .iter()
            .filter(|r| match r.status {
                ClassificationStatus::Conflict => policy.fail_on_conflict,
                ClassificationStatus::Unclassified => policy.fail_on_unclassified,
                _ => false,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ClassificationResults {
    type Item = &'a ClassificationResult;
    type IntoIter = std::slice::Iter<'a, ClassificationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
