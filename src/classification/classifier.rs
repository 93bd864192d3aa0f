//! Classification pass over a closed graph.
//!
//! Anchors and interface facts are computed first and shared read-only with
//! the criteria. Each type is then classified independently, in parallel,
//! and results are collected in graph type order.

use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info_span;

use super::anchors::AnchorContext;
use super::criteria::default_criteria;
use super::criterion::{Criterion, PRIORITY_EXPLICIT};
use super::engine::{decide, Contribution, CriteriaEngine};
use super::evidence::{ConfidenceLevel, Evidence};
use super::interface_facts::InterfaceFactsIndex;
use super::kinds::{ClassificationTarget, RoleKind};
use super::result::{ClassificationResult, ClassificationResults};
use crate::config::{ClassificationConfig, ExclusionMatcher};
use crate::errors::{Error, Result};
use crate::graph::{ApplicationGraph, GraphQuery, TypeNode};
use crate::observability::{set_current_node, set_phase, AnalysisPhase};

pub struct Classifier {
    exclusions: ExclusionMatcher,
    explicit: HashMap<String, RoleKind>,
    custom_criteria: Vec<Box<dyn Criterion>>,
}

impl Classifier {
    /// Compile the configuration; unknown explicit kinds and bad globs are errors
    pub fn new(config: &ClassificationConfig) -> Result<Self> {
        let explicit = config
            .explicit
            .iter()
            .map(|(name, kind)| {
                kind.parse::<RoleKind>()
                    .map(|kind| (name.clone(), kind))
                    .map_err(|_| {
                        Error::Configuration(format!(
                            "unknown kind '{kind}' configured for {name}"
                        ))
                    })
            })
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            exclusions: config.exclusion_matcher()?,
            explicit,
            custom_criteria: Vec::new(),
        })
    }

    /// Register an extra criterion, evaluated after the built-in ones
    pub fn with_criterion(mut self, criterion: Box<dyn Criterion>) -> Self {
        self.custom_criteria.push(criterion);
        self
    }

    pub fn classify(self, graph: &ApplicationGraph) -> ClassificationResults {
        let anchors = Arc::new(AnchorContext::analyze(graph));
        let query = graph.query();
        let facts = Arc::new(InterfaceFactsIndex::build(&query, &anchors));
        self.classify_with(graph, anchors, facts)
    }

    /// Classify with precomputed anchors and facts
    pub fn classify_with(
        self,
        graph: &ApplicationGraph,
        anchors: Arc<AnchorContext>,
        facts: Arc<InterfaceFactsIndex>,
    ) -> ClassificationResults {
        let _phase = set_phase(AnalysisPhase::Classification);
        let _span = info_span!("classification", types = graph.type_count()).entered();

        let mut criteria = default_criteria(facts, anchors);
        criteria.extend(self.custom_criteria);
        let engine = CriteriaEngine::with_criteria(criteria);
        let query = graph.query();

        let types: Vec<&TypeNode> = query
            .types()
            .into_iter()
            .filter(|t| !self.exclusions.is_excluded(&t.qualified_name))
            .collect();
        log::debug!(
            "Classifying {} types with {} criteria ({} excluded)",
            types.len(),
            engine.len(),
            graph.type_count() - types.len()
        );

        let results: Vec<ClassificationResult> = types
            .par_iter()
            .map(|node| {
                let _phase = set_phase(AnalysisPhase::Classification);
                let _node = set_current_node(&node.id);
                match self.explicit.get(&node.qualified_name) {
                    Some(kind) => explicit_result(node, *kind),
                    None => classify_node(&engine, node, &query),
                }
            })
            .collect();

        let results = ClassificationResults::new(results);
        let summary = results.summary();
        log::info!(
            "Classification: {} classified, {} conflicts, {} unclassified, {} not analyzed",
            summary.classified,
            summary.conflicts,
            summary.unclassified,
            summary.not_analyzed
        );
        results
    }
}

fn explicit_result(node: &TypeNode, kind: RoleKind) -> ClassificationResult {
    let winner = Contribution {
        criterion: "explicit-configuration".to_string(),
        kind,
        priority: PRIORITY_EXPLICIT,
        confidence: ConfidenceLevel::High,
        justification: format!("Configured as {kind}"),
        evidence: vec![Evidence::explicit_config(format!(
            "{} = {}",
            node.qualified_name, kind
        ))],
    };
    ClassificationResult::classified(node.id.clone(), winner, &[])
}

fn classify_node(
    engine: &CriteriaEngine,
    node: &TypeNode,
    query: &GraphQuery<'_>,
) -> ClassificationResult {
    let families = applicable_families(node, query);
    let evaluation = engine.evaluate(node, query, &families);
    let decision = decide(evaluation.contributions);
    ClassificationResult::from_decision(
        node.id.clone(),
        primary_family(node),
        decision,
        has_structural_signal(node, query),
    )
    .with_diagnostics(evaluation.diagnostics)
}

/// The family a type is reported under when no criterion wins
pub fn primary_family(node: &TypeNode) -> ClassificationTarget {
    if node.is_interface() {
        ClassificationTarget::Port
    } else {
        ClassificationTarget::Domain
    }
}

/// Interfaces are port candidates; other types are domain candidates and,
/// when exchanged through an interface signature, model candidates too.
pub fn applicable_families(node: &TypeNode, query: &GraphQuery<'_>) -> Vec<ClassificationTarget> {
    let primary = primary_family(node);
    if primary == ClassificationTarget::Port {
        return vec![primary];
    }
    let mut families = vec![primary];
    if !query.interfaces_using_in_signature(&node.id).is_empty() {
        families.push(ClassificationTarget::Model);
    }
    families
}

/// Whether an unmatched type is UNCLASSIFIED rather than NOT_ANALYZED
pub fn has_structural_signal(node: &TypeNode, query: &GraphQuery<'_>) -> bool {
    !node.annotations.is_empty()
        || !query.interfaces_using_in_signature(&node.id).is_empty()
        || !query.fields_of_type(&node.id).is_empty()
        || (node.is_interface()
            && (!query.implementors_of(&node.id).is_empty()
                || !query.types_injecting(&node.id).is_empty()))
        || query.supertype_of(&node.id).is_some()
        || !query.interfaces_of(&node.id).is_empty()
}
