//! Error types for graph construction, configuration and model loading.
//!
//! Structural errors (duplicate ids, dangling edges) are fatal to the call
//! that produced them. Classification ambiguity is never an error; it is
//! reported through [`crate::classification::ClassificationStatus`].

use std::path::PathBuf;
use thiserror::Error;

use crate::graph::{EdgeKind, NodeId};

/// Main error type for archlens operations
#[derive(Debug, Error)]
pub enum Error {
    /// A node with the same id is already part of the graph
    #[error("Duplicate node id: {id}")]
    DuplicateNode { id: NodeId },

    /// An edge references a node that is not part of the graph
    #[error("Dangling {kind} edge {from} -> {to}: node {missing} does not exist")]
    DanglingEdge {
        from: NodeId,
        to: NodeId,
        kind: EdgeKind,
        missing: NodeId,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An exclusion pattern could not be compiled
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A role kind name that no classification family knows about
    #[error("Unknown classification kind: {0}")]
    UnknownKind(String),

    /// File system errors carrying the offending path
    #[error("Failed to read {path}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a duplicate-node error
    pub fn duplicate_node(id: NodeId) -> Self {
        Self::DuplicateNode { id }
    }

    /// Create a dangling-edge error naming the missing endpoint
    pub fn dangling_edge(from: NodeId, to: NodeId, kind: EdgeKind, missing: NodeId) -> Self {
        Self::DanglingEdge {
            from,
            to,
            kind,
            missing,
        }
    }

    /// Create a file system error with path context
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// True for violations of the graph's structural invariants
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::DuplicateNode { .. } | Self::DanglingEdge { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
