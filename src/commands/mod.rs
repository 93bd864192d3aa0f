//! CLI command implementations.
//!
//! Available commands:
//! - **audit**: Classify a semantic model and validate architectural constraints
//! - **init**: Write a default `archlens.toml`

pub mod audit;
pub mod init;

pub use audit::{audit_project, render_json, render_text, run_audit, AuditCommand, AuditReport};
pub use init::{init_config, init_config_at};
