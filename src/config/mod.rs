//! Configuration for classification, cycle detection and auditing.
//!
//! Every section and field is optional in `archlens.toml`; absent values
//! fall back to the `default_*` functions of each section.

pub mod audit;
pub mod classification;
pub mod cycles;
pub mod loader;

use serde::{Deserialize, Serialize};

pub use audit::AuditConfig;
pub use classification::{ClassificationConfig, ExclusionMatcher, ValidationPolicy};
pub use cycles::CycleDetectionConfig;
pub use loader::{load_config, parse_config};

/// Root of `archlens.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchlensConfig {
    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub cycles: CycleDetectionConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}
