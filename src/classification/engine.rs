//! Criteria evaluation and priority/confidence arbitration.
//!
//! The engine owns the registered criteria in registration order. For one
//! node it evaluates every criterion whose target family applies, keeps the
//! matches, and [`decide`] ranks them by `(priority desc, confidence desc)`
//! with a stable sort so equal-ranked matches keep registration order.

use std::panic::{catch_unwind, AssertUnwindSafe};

use super::criterion::Criterion;
use super::evidence::{ConfidenceLevel, Evidence, MatchResult};
use super::kinds::{ClassificationTarget, RoleKind};
use crate::graph::{GraphQuery, TypeNode};
use crate::observability::get_current_context;

/// A criterion match, flattened with the criterion's metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub criterion: String,
    pub kind: RoleKind,
    pub priority: u32,
    pub confidence: ConfidenceLevel,
    pub justification: String,
    pub evidence: Vec<Evidence>,
}

impl Contribution {
    fn rank(&self) -> (u32, ConfidenceLevel) {
        (self.priority, self.confidence)
    }
}

/// Matches and failure diagnostics collected for one node
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub contributions: Vec<Contribution>,
    pub diagnostics: Vec<Evidence>,
}

/// Arbitration outcome over a set of contributions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing matched
    Empty,
    /// A single deterministic winner; `others` are the remaining matches in rank order
    Winner {
        winner: Contribution,
        others: Vec<Contribution>,
    },
    /// Top-ranked matches disagree on incompatible kinds
    Conflict {
        tied: Vec<Contribution>,
        others: Vec<Contribution>,
    },
}

#[derive(Default)]
pub struct CriteriaEngine {
    criteria: Vec<Box<dyn Criterion>>,
}

impl CriteriaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_criteria(criteria: Vec<Box<dyn Criterion>>) -> Self {
        Self { criteria }
    }

    pub fn register(&mut self, criterion: Box<dyn Criterion>) {
        self.criteria.push(criterion);
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn criterion_names(&self) -> Vec<&str> {
        self.criteria.iter().map(|c| c.name()).collect()
    }

    /// Evaluate every criterion targeting one of `families` against `node`.
    ///
    /// A criterion returning `Err` or panicking yields no contribution and a
    /// diagnostic evidence entry for this node only.
    pub fn evaluate(
        &self,
        node: &TypeNode,
        query: &GraphQuery<'_>,
        families: &[ClassificationTarget],
    ) -> Evaluation {
        let mut evaluation = Evaluation::default();

        for criterion in &self.criteria {
            let kind = criterion.target_kind();
            if !families.contains(&kind.target()) {
                continue;
            }

            let outcome = catch_unwind(AssertUnwindSafe(|| criterion.evaluate(node, query)));
            match outcome {
                Ok(Ok(MatchResult::NoMatch)) => {}
                Ok(Ok(MatchResult::Match {
                    confidence,
                    justification,
                    evidence,
                })) => evaluation.contributions.push(Contribution {
                    criterion: criterion.name().to_string(),
                    kind,
                    priority: criterion.priority(),
                    confidence,
                    justification,
                    evidence,
                }),
                Ok(Err(err)) => {
                    evaluation
                        .diagnostics
                        .push(criterion_failure(criterion.name(), &format!("{err:#}")));
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    evaluation
                        .diagnostics
                        .push(criterion_failure(criterion.name(), &format!("panicked: {message}")));
                }
            }
        }

        evaluation
    }
}

fn criterion_failure(name: &str, message: &str) -> Evidence {
    log::warn!(
        "Criterion '{}' failed [{}]: {}",
        name,
        get_current_context(),
        message
    );
    Evidence::diagnostic(format!("Criterion '{name}' failed: {message}"))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Rank contributions and pick a winner or report a conflict.
///
/// The tied group is every contribution sharing the top `(priority,
/// confidence)`. Any incompatible pair inside it is a conflict; otherwise
/// the first-registered member of the group wins.
pub fn decide(mut contributions: Vec<Contribution>) -> Decision {
    if contributions.is_empty() {
        return Decision::Empty;
    }

    contributions.sort_by(|a, b| b.rank().cmp(&a.rank()));

    let top = contributions[0].rank();
    let tied_len = contributions
        .iter()
        .take_while(|c| c.rank() == top)
        .count();
    let others = contributions.split_off(tied_len);
    let tied = contributions;

    let incompatible = tied.iter().enumerate().any(|(i, a)| {
        tied[i + 1..]
            .iter()
            .any(|b| !a.kind.is_compatible_with(&b.kind))
    });

    if incompatible {
        return Decision::Conflict { tied, others };
    }

    let mut tied = tied.into_iter();
    match tied.next() {
        Some(winner) => {
            let mut rest: Vec<Contribution> = tied.collect();
            rest.extend(others);
            Decision::Winner {
                winner,
                others: rest,
            }
        }
        None => Decision::Empty,
    }
}
