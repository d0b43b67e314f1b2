//! Core rendering logic for Folio.
//!
//! # Modules
//!
//! - [`render`] - Templating runtime, evaluation context and the render engine
//! - [`output`] - Deterministic artifact paths
//! - [`export`] - Batch export with per-report failure isolation
//!
//! # Render Workflow
//!
//! 1. **Runtime**: Acquire the process-wide template environment
//! 2. **Resolve**: Derive `<exports>/<Report_Name>_<locale>` and truncate it
//! 3. **Subjects**: Use the supplied subject set or generate one
//! 4. **Evaluate**: Stream template output into the artifact
//! 5. **Diagnose**: On failure, append the error block after the partial output
//!
//! # Example
//!
//! ```rust,no_run
//! use folio::core::export::ExportCoordinator;
//! use folio::domain::report::{InlineReport, ReportDefinition};
//! use folio::config::FolioConfig;
//!
//! let config = FolioConfig::default();
//! let reports: Vec<Box<dyn ReportDefinition>> = vec![Box::new(
//!     InlineReport::new("census", "Daily Census", "{{ patientSet | length }}").unwrap(),
//! )];
//!
//! let summary = ExportCoordinator::from_config(&config).render_all(&reports);
//! println!("Rendered: {}", summary.rendered);
//! ```

pub mod export;
pub mod output;
pub mod render;
