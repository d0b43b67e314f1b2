//! Domain models and types for Folio.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ReportId`], [`SubjectId`], [`Locale`])
//! - **Report definitions** ([`ReportDefinition`], [`InlineReport`])
//! - **Data subjects** ([`DataSubject`], [`DataSubjectSet`])
//! - **Error types** ([`FolioError`]) and the [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use folio::domain::{DataSubject, DataSubjectSet, InlineReport, ReportDefinition};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let report = InlineReport::new("visits", "Monthly Visits", "{{ patientSet | length }} visits")?
//!     .with_generator(|| Ok(DataSubjectSet::from_subjects(vec![DataSubject::new("p-1")?])));
//!
//! let subjects = report.generate_subject_set()?;
//! assert_eq!(subjects.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod report;
pub mod result;
pub mod subject;

pub use errors::FolioError;
pub use ids::{Locale, ReportId, SubjectId};
pub use report::{InlineReport, ReportDefinition};
pub use result::Result;
pub use subject::{DataSubject, DataSubjectSet};
