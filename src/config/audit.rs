use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::validation::Severity;

/// Settings for constraint validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Constraint ids that are not run
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Constraint id -> severity replacing the validator's default
    #[serde(default)]
    pub severity_overrides: BTreeMap<String, Severity>,

    /// Package prefixes domain types must not reference
    #[serde(default = "default_forbidden_domain_prefixes")]
    pub forbidden_domain_prefixes: Vec<String>,

    /// Lowest severity that fails an audit (default: CRITICAL)
    #[serde(default = "default_fail_on")]
    pub fail_on: Severity,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            severity_overrides: BTreeMap::new(),
            forbidden_domain_prefixes: default_forbidden_domain_prefixes(),
            fail_on: default_fail_on(),
        }
    }
}

impl AuditConfig {
    pub fn is_enabled(&self, constraint_id: &str) -> bool {
        !self.disabled.iter().any(|id| id == constraint_id)
    }

    /// Severity to report for a constraint, honouring overrides
    pub fn severity_for(&self, constraint_id: &str, default: Severity) -> Severity {
        self.severity_overrides
            .get(constraint_id)
            .copied()
            .unwrap_or(default)
    }
}

fn default_forbidden_domain_prefixes() -> Vec<String> {
    [
        "javax.persistence",
        "jakarta.persistence",
        "org.springframework",
        "org.hibernate",
        "com.fasterxml.jackson",
        "javax.ws.rs",
        "jakarta.ws.rs",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_fail_on() -> Severity {
    Severity::Critical
}
