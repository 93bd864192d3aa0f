//! `archlens audit`: build the graph, classify it and validate constraints.

use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::Table;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::classification::{
    AnchorContext, ClassificationResults, ClassificationStatus, ClassificationSummary, Classifier,
    InterfaceFactsIndex,
};
use crate::cli::OutputFormat;
use crate::config::{load_config, ArchlensConfig};
use crate::graph::{GraphBuilder, NodeId};
use crate::semantic::SemanticModel;
use crate::validation::{default_validators, run_validators, Severity, Violation};

pub struct AuditCommand {
    pub model: PathBuf,
    pub config: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub plain: bool,
    pub verbosity: u8,
}

/// Everything one audit produced
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub summary: ClassificationSummary,
    pub classifications: ClassificationResults,
    pub violations: Vec<Violation>,
    /// Results rejected by the classification policy
    pub policy_failures: Vec<NodeId>,
    pub fail_on: Severity,
    pub passed: bool,
}

impl AuditReport {
    /// Violations at or above the failure threshold
    pub fn blocking_violations(&self) -> impl Iterator<Item = &Violation> {
        let fail_on = self.fail_on;
        self.violations.iter().filter(move |v| v.severity >= fail_on)
    }

    pub fn count_at(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}

/// Run the full pipeline over an in-memory model
pub fn run_audit(model: &SemanticModel, config: &ArchlensConfig) -> crate::errors::Result<AuditReport> {
    let graph = GraphBuilder::new().build(model)?;
    let anchors = Arc::new(AnchorContext::analyze(&graph));
    let facts = Arc::new(InterfaceFactsIndex::build(&graph.query(), &anchors));
    let classifications = Classifier::new(&config.classification)?.classify_with(
        &graph,
        Arc::clone(&anchors),
        facts,
    );
    let validators = default_validators(config, anchors);
    let violations = run_validators(&validators, &graph, &classifications, &config.audit);

    let policy_failures: Vec<NodeId> = classifications
        .policy_failures(&config.classification.validation)
        .into_iter()
        .map(|r| r.node_id.clone())
        .collect();
    let fail_on = config.audit.fail_on;
    let passed =
        policy_failures.is_empty() && violations.iter().all(|v| v.severity < fail_on);

    Ok(AuditReport {
        summary: classifications.summary(),
        classifications,
        violations,
        policy_failures,
        fail_on,
        passed,
    })
}

/// Run the command; `Ok(false)` means the audit completed and failed
pub fn audit_project(command: AuditCommand) -> Result<bool> {
    if command.plain {
        colored::control::set_override(false);
    }

    let config = load_config(&command.config)
        .with_context(|| format!("Failed to load {}", command.config.display()))?;
    let model = SemanticModel::load(&command.model)
        .with_context(|| format!("Failed to load model {}", command.model.display()))?;

    let report = run_audit(&model, &config)?;
    let rendered = match command.format {
        OutputFormat::Text => render_text(&report, command.verbosity),
        OutputFormat::Json => render_json(&report)?,
    };

    match &command.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(report.passed)
}

pub fn render_json(report: &AuditReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// Human-readable report; `verbosity > 0` adds the per-type classification table
pub fn render_text(report: &AuditReport, verbosity: u8) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Classification".bold()));
    let summary = &report.summary;
    let mut table = Table::new();
    table.set_header(vec!["Status", "Count"]);
    for (status, count) in [
        (ClassificationStatus::Classified, summary.classified),
        (ClassificationStatus::Unclassified, summary.unclassified),
        (ClassificationStatus::Conflict, summary.conflicts),
        (ClassificationStatus::NotAnalyzed, summary.not_analyzed),
    ] {
        table.add_row(vec![status.to_string(), count.to_string()]);
    }
    table.add_row(vec!["TOTAL".to_string(), summary.total.to_string()]);
    out.push_str(&format!("{table}\n"));

    if verbosity > 0 {
        out.push_str(&format!("\n{}\n", "Types".bold()));
        out.push_str(&format!("{}\n", classification_table(&report.classifications)));
    }

    out.push_str(&format!("\n{}\n", "Violations".bold()));
    if report.violations.is_empty() {
        out.push_str("none\n");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Severity", "Constraint", "Message"]);
        for violation in &report.violations {
            table.add_row(vec![
                violation.severity.to_string(),
                violation.constraint_id.clone(),
                violation.message.clone(),
            ]);
        }
        out.push_str(&format!("{table}\n"));

        let counts: Vec<String> = [
            Severity::Blocker,
            Severity::Critical,
            Severity::Major,
            Severity::Minor,
            Severity::Info,
        ]
        .into_iter()
        .map(|s| format!("{}: {}", s.as_str().color(s.color()), report.count_at(s)))
        .collect();
        out.push_str(&format!("{}\n", counts.join("  ")));
    }

    if !report.policy_failures.is_empty() {
        out.push_str(&format!("\n{}\n", "Policy failures".bold()));
        for id in &report.policy_failures {
            let status = report
                .classifications
                .get(id)
                .map(|r| r.status.as_str())
                .unwrap_or("UNKNOWN");
            out.push_str(&format!("  {} ({status})\n", id.value()));
        }
    }

    let blocking = report.blocking_violations().count();
    let verdict = if report.passed {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    out.push_str(&format!(
        "\n{verdict}: {blocking} violation(s) at or above {}, {} policy failure(s)\n",
        report.fail_on,
        report.policy_failures.len()
    ));
    out
}

fn classification_table(results: &ClassificationResults) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Type", "Status", "Kind", "Confidence", "Criterion"]);
    for result in results {
        table.add_row(vec![
            result.node_id.value().to_string(),
            result.status.to_string(),
            result.kind.map(|k| k.to_string()).unwrap_or_default(),
            result.confidence.map(|c| c.to_string()).unwrap_or_default(),
            result.criterion.clone().unwrap_or_default(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{TypeForm, TypeRef};
    use crate::semantic::{SourceField, SourceType};

    fn model(types: Vec<SourceType>) -> SemanticModel {
        SemanticModel {
            types,
            ..Default::default()
        }
    }

    fn aggregate_cycle_config() -> ArchlensConfig {
        let mut config = ArchlensConfig::default();
        config.classification = config
            .classification
            .with_explicit("shop.order.Order", "AGGREGATE_ROOT")
            .with_explicit("shop.customer.Customer", "AGGREGATE_ROOT");
        config
    }

    fn aggregate_cycle() -> SemanticModel {
        model(vec![
            SourceType::new("shop.order.Order", TypeForm::Class)
                .with_field(SourceField::private_final("customer", TypeRef::new("shop.customer.Customer"))),
            SourceType::new("shop.customer.Customer", TypeForm::Class)
                .with_field(SourceField::private_final("lastOrder", TypeRef::new("shop.order.Order"))),
        ])
    }

    #[test]
    fn test_empty_model_passes() {
        let report = run_audit(&SemanticModel::default(), &ArchlensConfig::default()).unwrap();
        assert!(report.passed);
        assert_eq!(report.summary.total, 0);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_aggregate_cycle_fails_audit() {
        let report = run_audit(&aggregate_cycle(), &aggregate_cycle_config()).unwrap();
        assert!(!report.passed);
        assert!(report
            .blocking_violations()
            .any(|v| v.constraint_id == "ddd:aggregate-cycle"));
    }

    #[test]
    fn test_raised_threshold_passes_same_model() {
        let mut config = aggregate_cycle_config();
        config.audit.fail_on = Severity::Blocker;
        let report = run_audit(&aggregate_cycle(), &config).unwrap();
        assert!(report.passed);
        assert!(!report.violations.is_empty());
    }

    #[test]
    fn test_text_report_lists_violations() {
        colored::control::set_override(false);
        let report = run_audit(&aggregate_cycle(), &aggregate_cycle_config()).unwrap();
        let text = render_text(&report, 1);
        assert!(text.contains("ddd:aggregate-cycle"));
        assert!(text.contains("FAILED"));
        assert!(text.contains("shop.order.Order"));
    }

    #[test]
    fn test_json_report_is_parseable() {
        let report = run_audit(&aggregate_cycle(), &aggregate_cycle_config()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(json["passed"], serde_json::Value::Bool(false));
        assert_eq!(json["fail_on"], "CRITICAL");
        assert!(json["violations"].as_array().is_some_and(|v| !v.is_empty()));
    }
}
