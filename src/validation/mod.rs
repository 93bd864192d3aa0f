//! Architectural constraint validation.
//!
//! Each [`ConstraintValidator`] checks one rule against the closed graph and
//! the classification results and reports [`Violation`]s. Validators never
//! modify their inputs and do not depend on each other.

pub mod ddd;
pub mod dependency;
pub mod hexagonal;
pub mod layers;
pub mod severity;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::info_span;

use crate::classification::{AnchorContext, ClassificationResults};
use crate::config::{ArchlensConfig, AuditConfig};
use crate::graph::{ApplicationGraph, GraphQuery, NodeId};
use crate::observability::{set_phase, AnalysisPhase};

pub use ddd::{AggregateCycleValidator, DomainPurityValidator, ValueObjectImmutableValidator};
pub use dependency::PackageCycleValidator;
pub use hexagonal::{
    LayeringValidator, PortCoverageValidator, PortDependencyValidator, PortDirectionValidator,
};
pub use layers::{Layer, LayerClassifier};
pub use severity::Severity;

/// One broken rule, with the nodes involved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub constraint_id: String,
    pub severity: Severity,
    pub message: String,
    pub nodes: Vec<NodeId>,
}

impl Violation {
    pub fn new(
        constraint_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        nodes: Vec<NodeId>,
    ) -> Self {
        Self {
            constraint_id: constraint_id.into(),
            severity,
            message: message.into(),
            nodes,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.constraint_id, self.message)
    }
}

pub trait ConstraintValidator: Send + Sync {
    /// Stable identifier such as `ddd:aggregate-cycle`
    fn constraint_id(&self) -> &str;

    fn default_severity(&self) -> Severity;

    fn validate(
        &self,
        graph: &ApplicationGraph,
        classification: &ClassificationResults,
        query: &GraphQuery<'_>,
    ) -> Vec<Violation>;
}

/// Run every enabled validator and concatenate the violations in
/// registration order.
///
/// Violations reported at a validator's default severity take the
/// configured override, if any; other severities are kept as reported.
pub fn run_validators(
    validators: &[Box<dyn ConstraintValidator>],
    graph: &ApplicationGraph,
    classification: &ClassificationResults,
    config: &AuditConfig,
) -> Vec<Violation> {
    let _phase = set_phase(AnalysisPhase::Validation);
    let _span = info_span!("validation", validators = validators.len()).entered();
    let query = graph.query();

    let mut violations = Vec::new();
    for validator in validators {
        let id = validator.constraint_id();
        if !config.is_enabled(id) {
            log::debug!("Skipping disabled constraint {id}");
            continue;
        }

        let default = validator.default_severity();
        let severity = config.severity_for(id, default);
        let found = validator.validate(graph, classification, &query);
        log::debug!("{id}: {} violation(s)", found.len());

        violations.extend(found.into_iter().map(|mut violation| {
            if violation.severity == default {
                violation.severity = severity;
            }
            violation
        }));
    }

    log::info!(
        "Validation: {} violation(s) from {} constraint(s)",
        violations.len(),
        validators.len()
    );
    violations
}

/// The standard validator set; `anchors` are the ones classification ran with
pub fn default_validators(
    config: &ArchlensConfig,
    anchors: Arc<AnchorContext>,
) -> Vec<Box<dyn ConstraintValidator>> {
    vec![
        Box::new(AggregateCycleValidator::new(config.cycles)),
        Box::new(PortDependencyValidator::new(Arc::clone(&anchors))),
        Box::new(ValueObjectImmutableValidator),
        Box::new(PortDirectionValidator::new(anchors)),
        Box::new(PortCoverageValidator),
        Box::new(DomainPurityValidator::new(
            config.audit.forbidden_domain_prefixes.clone(),
        )),
        Box::new(LayeringValidator::default()),
        Box::new(PackageCycleValidator::new(config.cycles)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Always(Severity);

    impl ConstraintValidator for Always {
        fn constraint_id(&self) -> &str {
            "test:always"
        }

        fn default_severity(&self) -> Severity {
            self.0
        }

        fn validate(
            &self,
            _graph: &ApplicationGraph,
            _classification: &ClassificationResults,
            _query: &GraphQuery<'_>,
        ) -> Vec<Violation> {
            vec![
                Violation::new("test:always", self.0, "default", vec![]),
                Violation::new("test:always", Severity::Info, "note", vec![]),
            ]
        }
    }

    fn run(config: &AuditConfig) -> Vec<Violation> {
        let graph = ApplicationGraph::new();
        let validators: Vec<Box<dyn ConstraintValidator>> = vec![Box::new(Always(Severity::Major))];
        run_validators(&validators, &graph, &ClassificationResults::new(vec![]), config)
    }

    #[test]
    fn test_override_applies_to_default_severity_only() {
        let mut config = AuditConfig::default();
        config
            .severity_overrides
            .insert("test:always".to_string(), Severity::Blocker);

        let violations = run(&config);
        assert_eq!(violations[0].severity, Severity::Blocker);
        assert_eq!(violations[1].severity, Severity::Info);
    }

    #[test]
    fn test_disabled_constraint_is_skipped() {
        let config = AuditConfig {
            disabled: vec!["test:always".to_string()],
            ..AuditConfig::default()
        };
        assert!(run(&config).is_empty());
    }

    #[test]
    fn test_default_validator_ids_are_unique() {
        let validators =
            default_validators(&ArchlensConfig::default(), Arc::new(AnchorContext::default()));
        let ids: HashSet<&str> = validators.iter().map(|v| v.constraint_id()).collect();
        assert_eq!(ids.len(), 8);
        assert!(ids.contains("ddd:aggregate-cycle"));
        assert!(ids.contains("dependency:package-cycles"));
    }
}
