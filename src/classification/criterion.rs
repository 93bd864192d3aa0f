use super::evidence::MatchResult;
use super::kinds::RoleKind;
use crate::graph::{GraphQuery, TypeNode};

/// Priority of explicit annotations and user configuration
pub const PRIORITY_EXPLICIT: u32 = 100;
/// Priority of interface-facts driven port criteria
pub const PRIORITY_SEMANTIC: u32 = 85;
/// Priority of strong naming and structural heuristics
pub const PRIORITY_STRONG: u32 = 80;
/// Priority of inherited, CQRS and dependency-injection heuristics
pub const PRIORITY_RELATIONSHIP: u32 = 75;
/// Priority of graph-shape heuristics
pub const PRIORITY_GRAPH: u32 = 70;
/// Priority of weak package and naming hints
pub const PRIORITY_WEAK: u32 = 60;

/// One independent rule scoring a type against a single candidate kind.
///
/// Criteria are evaluated concurrently across types, so implementations
/// must be `Send + Sync` and must not keep per-node state. An `Err` or a
/// panic from [`evaluate`](Criterion::evaluate) is isolated by the engine
/// and turned into a no-match with diagnostic evidence.
pub trait Criterion: Send + Sync {
    fn name(&self) -> &str;

    /// Coarse trust level; higher wins before confidence is compared
    fn priority(&self) -> u32;

    fn target_kind(&self) -> RoleKind;

    fn evaluate(&self, node: &TypeNode, query: &GraphQuery<'_>) -> anyhow::Result<MatchResult>;
}
