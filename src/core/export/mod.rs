//! Batch export orchestration
//!
//! - Export coordination across a list of report definitions
//! - Summary and reporting

pub mod coordinator;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use summary::{ExportError, ExportErrorType, ExportSummary, ExportedArtifact};
