//! Architectural role classification.
//!
//! Types are scored by independent [`Criterion`] implementations and the
//! [`CriteriaEngine`] arbitrates between matches. [`Classifier`] wires the
//! built-in criteria, configuration and parallel evaluation together.

pub mod anchors;
pub mod classifier;
pub mod criteria;
pub mod criterion;
pub mod engine;
pub mod evidence;
pub mod interface_facts;
pub mod kinds;
pub mod result;

pub use anchors::{AnchorContext, AnchorKind};
pub use classifier::Classifier;
pub use criterion::Criterion;
pub use engine::{decide, Contribution, CriteriaEngine, Decision, Evaluation};
pub use evidence::{ConfidenceLevel, Evidence, EvidenceType, MatchResult};
pub use interface_facts::{InterfaceFacts, InterfaceFactsIndex};
pub use kinds::{
    ClassificationTarget, DomainKind, ModelKind, PortDirection, PortKind, RoleKind,
};
pub use result::{
    ClassificationResult, ClassificationResults, ClassificationStatus, ClassificationSummary,
    Conflict, ConflictSeverity,
};
