use serde::{Deserialize, Serialize};

/// Bounds for cycle enumeration on densely connected graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDetectionConfig {
    /// Stop enumerating after this many cycles and flag the report as truncated (default: 100)
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,

    /// Witness edges recorded per projected edge (default: 10)
    #[serde(default = "default_max_dependencies_per_edge")]
    pub max_dependencies_per_edge: usize,

    /// Include DERIVED edges when projecting the graph (default: true)
    #[serde(default = "default_include_transitive")]
    pub include_transitive: bool,
}

impl Default for CycleDetectionConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
            max_dependencies_per_edge: default_max_dependencies_per_edge(),
            include_transitive: default_include_transitive(),
        }
    }
}

impl CycleDetectionConfig {
    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn with_max_dependencies_per_edge(mut self, max: usize) -> Self {
        self.max_dependencies_per_edge = max;
        self
    }

    pub fn with_include_transitive(mut self, include: bool) -> Self {
        self.include_transitive = include;
        self
    }
}

fn default_max_cycles() -> usize {
    100
}

fn default_max_dependencies_per_edge() -> usize {
    10
}

fn default_include_transitive() -> bool {
    true
}
