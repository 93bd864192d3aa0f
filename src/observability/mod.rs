//! Context tracking for diagnostics.
//!
//! Criterion failures and truncated detections are logged together with
//! the phase and node recorded here, so a warning always says where it
//! came from.
//!
//! ```ignore
//! use archlens::observability::{set_current_node, set_phase, AnalysisPhase};
//!
//! let _phase = set_phase(AnalysisPhase::Classification);
//! for id in type_ids {
//!     let _node = set_current_node(&id);
//!     classify(&id);
//! }
//! ```

pub mod context;

pub use context::{
    get_current_context, set_current_node, set_phase, AnalysisContext, AnalysisPhase,
    ContextGuard,
};
