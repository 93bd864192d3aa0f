//! Architectural role classification and constraint auditing for
//! object-oriented codebases.
//!
//! A language frontend produces a [`SemanticModel`]; [`GraphBuilder`] turns
//! it into an append-only [`ApplicationGraph`], the [`Classifier`] assigns
//! architectural roles and the validators in [`validation`] report
//! [`Violation`]s.

pub mod classification;
pub mod cli;
pub mod commands;
pub mod config;
pub mod cycles;
pub mod errors;
pub mod graph;
pub mod observability;
pub mod semantic;
pub mod validation;

// Re-export commonly used types
pub use crate::classification::{
    ClassificationResult, ClassificationResults, ClassificationStatus, Classifier, Criterion,
    InterfaceFacts, RoleKind,
};
pub use crate::config::{load_config, ArchlensConfig, CycleDetectionConfig};
pub use crate::cycles::{
    compute_scc_mapping, find_strongly_connected_components, CycleDetector, CycleReport,
    DirectedGraph,
};
pub use crate::errors::{Error, Result};
pub use crate::graph::{ApplicationGraph, GraphBuilder, GraphQuery, NodeId};
pub use crate::semantic::SemanticModel;
pub use crate::validation::{run_validators, ConstraintValidator, Severity, Violation};
