//! Report definition domain model
//!
//! A report definition is owned by the surrounding system. The renderer only
//! reads it: identity, the template body and the logic that produces the
//! subject set.

use super::errors::FolioError;
use super::ids::ReportId;
use super::result::Result;
use super::subject::DataSubjectSet;
use std::fmt;

/// A named unit describing a template and how to obtain its data
pub trait ReportDefinition: Send + Sync {
    /// Report identifier
    fn id(&self) -> &ReportId;

    /// Human-readable report name, used to derive the artifact file name
    fn name(&self) -> &str;

    /// Returns the template body
    fn template(&self) -> Result<String>;

    /// Computes the subject set this report renders against
    ///
    /// Called at most once per render, and never when the caller supplies a
    /// subject set.
    fn generate_subject_set(&self) -> Result<DataSubjectSet>;
}

type SubjectGenerator = Box<dyn Fn() -> std::result::Result<DataSubjectSet, String> + Send + Sync>;

/// In-memory report definition with an inline template and a generator closure
///
/// # Examples
///
/// ```
/// use folio::domain::report::{InlineReport, ReportDefinition};
/// use folio::domain::subject::{DataSubject, DataSubjectSet};
///
/// let report = InlineReport::new("visits", "Monthly Visits", "{{ patientSet | length }}")
///     .unwrap()
///     .with_generator(|| Ok(DataSubjectSet::from_subjects(vec![DataSubject::new("p-1")?])));
///
/// assert_eq!(report.name(), "Monthly Visits");
/// assert_eq!(report.generate_subject_set().unwrap().len(), 1);
/// ```
pub struct InlineReport {
    id: ReportId,
    name: String,
    template: String,
    generator: SubjectGenerator,
}

impl InlineReport {
    /// Creates a report whose generator yields an empty subject set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        template: impl Into<String>,
    ) -> std::result::Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Report name cannot be empty".to_string());
        }
        Ok(Self {
            id: ReportId::new(id)?,
            name,
            template: template.into(),
            generator: Box::new(|| Ok(DataSubjectSet::new())),
        })
    }

    /// Replaces the subject set generator
    pub fn with_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> std::result::Result<DataSubjectSet, String> + Send + Sync + 'static,
    {
        self.generator = Box::new(generator);
        self
    }
}

impl ReportDefinition for InlineReport {
    fn id(&self) -> &ReportId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn template(&self) -> Result<String> {
        Ok(self.template.clone())
    }

    fn generate_subject_set(&self) -> Result<DataSubjectSet> {
        (self.generator)().map_err(|e| FolioError::subject_set(&self.name, e))
    }
}

impl fmt::Debug for InlineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineReport")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("template_len", &self.template.len())
            .finish()
    }
}
