//! Thread-local context tracking for diagnostics.
//!
//! Records which analysis phase is running and which node is being
//! processed. The context is per thread (rayon workers each carry their
//! own) and guards restore the previous value on drop, so nesting works.

use std::cell::RefCell;

use crate::graph::NodeId;

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> = const { RefCell::new(AnalysisContext::new()) };
}

/// Snapshot of what the current thread is doing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    pub current_node: Option<NodeId>,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_node: None,
        }
    }
}

impl std::fmt::Display for AnalysisContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.phase, &self.current_node) {
            (Some(phase), Some(node)) => write!(f, "{phase} @ {node}"),
            (Some(phase), None) => write!(f, "{phase}"),
            (None, Some(node)) => write!(f, "{node}"),
            (None, None) => write!(f, "idle"),
        }
    }
}

/// Major stages of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    GraphBuilding,
    AnchorDetection,
    InterfaceFacts,
    Classification,
    CycleDetection,
    Validation,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GraphBuilding => write!(f, "graph_building"),
            Self::AnchorDetection => write!(f, "anchor_detection"),
            Self::InterfaceFacts => write!(f, "interface_facts"),
            Self::Classification => write!(f, "classification"),
            Self::CycleDetection => write!(f, "cycle_detection"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

/// RAII guard restoring the previous context on drop
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update_context(update: impl FnOnce(&mut AnalysisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        update(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current analysis phase.
///
/// # Example
///
/// ```
/// use archlens::observability::{get_current_context, set_phase, AnalysisPhase};
///
/// {
///     let _phase = set_phase(AnalysisPhase::Classification);
///     assert_eq!(get_current_context().phase, Some(AnalysisPhase::Classification));
/// }
/// assert_eq!(get_current_context().phase, None);
/// ```
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    update_context(|ctx| ctx.phase = Some(phase))
}

/// Set the node currently being processed
#[must_use]
pub fn set_current_node(node: &NodeId) -> ContextGuard {
    update_context(|ctx| ctx.current_node = Some(node.clone()))
}

pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_guards_restore_previous_context() {
        let _phase = set_phase(AnalysisPhase::Validation);
        {
            let _node = set_current_node(&NodeId::for_type("a.Order"));
            let ctx = get_current_context();
            assert_eq!(ctx.phase, Some(AnalysisPhase::Validation));
            assert_eq!(ctx.to_string(), "validation @ type:a.Order");
        }
        let ctx = get_current_context();
        assert_eq!(ctx.current_node, None);
        assert_eq!(ctx.phase, Some(AnalysisPhase::Validation));
    }

    #[test]
    fn test_context_is_thread_local() {
        let _phase = set_phase(AnalysisPhase::Classification);
        let other = std::thread::spawn(get_current_context).join().unwrap();
        assert_eq!(other.phase, None);
    }
}
