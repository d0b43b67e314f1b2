//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::core::render::{RenderOutcome, RenderStatus};
use crate::domain::ids::ReportId;
use crate::domain::FolioError;
use std::path::PathBuf;
use std::time::Duration;

/// Artifact written by one report in a batch
#[derive(Debug, Clone)]
pub struct ExportedArtifact {
    /// Report ID
    pub report_id: ReportId,

    /// Artifact path
    pub path: PathBuf,

    /// Whether evaluation completed or a diagnostic was appended
    pub status: RenderStatus,
}

impl From<&RenderOutcome> for ExportedArtifact {
    fn from(outcome: &RenderOutcome) -> Self {
        Self {
            report_id: outcome.report_id.clone(),
            path: outcome.path.clone(),
            status: outcome.status.clone(),
        }
    }
}

/// Summary of a batch export
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Number of reports in the batch
    pub total_reports: usize,

    /// Reports whose template evaluated to completion
    pub rendered: usize,

    /// Reports written with an inline diagnostic
    pub partial: usize,

    /// Reports that produced no artifact
    pub failed: usize,

    /// Duration of the export
    pub duration: Duration,

    /// Errors encountered during export
    pub errors: Vec<ExportError>,

    /// Artifacts written, in batch order
    pub artifacts: Vec<ExportedArtifact>,

    /// Whether a shutdown signal stopped the batch early
    pub interrupted: bool,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(total_reports: usize) -> Self {
        Self {
            total_reports,
            ..Self::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Records a render that produced an artifact
    pub fn record_outcome(&mut self, outcome: &RenderOutcome) {
        match &outcome.status {
            RenderStatus::Complete => self.rendered += 1,
            RenderStatus::Partial { .. } => self.partial += 1,
        }
        self.artifacts.push(ExportedArtifact::from(outcome));
    }

    /// Records a report that failed before producing an artifact
    pub fn record_failure(&mut self, error: ExportError) {
        self.failed += 1;
        self.errors.push(error);
    }

    /// Number of reports not attempted
    pub fn skipped(&self) -> usize {
        self.total_reports
            .saturating_sub(self.rendered + self.partial + self.failed)
    }

    /// Check if every report rendered to completion
    pub fn is_successful(&self) -> bool {
        self.failed == 0 && self.partial == 0 && !self.interrupted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_reports = self.total_reports,
            rendered = self.rendered,
            partial = self.partial,
            failed = self.failed,
            skipped = self.skipped(),
            interrupted = self.interrupted,
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );

        for artifact in &self.artifacts {
            if let RenderStatus::Partial { error } = &artifact.status {
                tracing::warn!(
                    report_id = %artifact.report_id,
                    path = %artifact.path.display(),
                    error = %error,
                    "Artifact contains an evaluation diagnostic"
                );
            }
        }

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Export error"
                );
            }
        }
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Subject set generation failed
    SubjectSet,
    /// Template body could not be retrieved
    Template,
    /// Output path could not be resolved, opened or written
    Output,
    /// Configuration error
    Configuration,
    /// Unknown error
    Unknown,
}

impl From<&FolioError> for ExportErrorType {
    fn from(error: &FolioError) -> Self {
        match error {
            FolioError::SubjectSetGeneration { .. } => ExportErrorType::SubjectSet,
            FolioError::Template { .. } => ExportErrorType::Template,
            FolioError::Output { .. } | FolioError::Io(_) => ExportErrorType::Output,
            FolioError::Configuration(_) | FolioError::Validation(_) => {
                ExportErrorType::Configuration
            }
            _ => ExportErrorType::Unknown,
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g., report ID and name)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

impl From<&FolioError> for ExportError {
    fn from(error: &FolioError) -> Self {
        Self::new(ExportErrorType::from(error), error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, status: RenderStatus) -> RenderOutcome {
        RenderOutcome {
            report_id: ReportId::new(id).unwrap(),
            path: PathBuf::from(format!("/tmp/{id}")),
            status,
            subject_count: 0,
            degraded_runtime: false,
        }
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new(3);

        assert_eq!(summary.total_reports, 3);
        assert_eq!(summary.rendered, 0);
        assert_eq!(summary.partial, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.skipped(), 3);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.errors.is_empty());
        assert!(summary.artifacts.is_empty());
        assert!(!summary.interrupted);
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new(0).with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_record_outcomes() {
        let mut summary = ExportSummary::new(3);
        summary.record_outcome(&outcome("a", RenderStatus::Complete));
        summary.record_outcome(&outcome(
            "b",
            RenderStatus::Partial {
                error: "boom".to_string(),
            },
        ));

        assert_eq!(summary.rendered, 1);
        assert_eq!(summary.partial, 1);
        assert_eq!(summary.artifacts.len(), 2);
        assert_eq!(summary.skipped(), 1);
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_record_failure() {
        let mut summary = ExportSummary::new(2);
        summary.record_outcome(&outcome("a", RenderStatus::Complete));
        summary.record_failure(
            ExportError::new(ExportErrorType::SubjectSet, "no cohort".to_string())
                .with_context("report_id=b".to_string()),
        );

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors[0].context.as_deref(), Some("report_id=b"));
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_is_successful() {
        let mut summary = ExportSummary::new(1);
        summary.record_outcome(&outcome("a", RenderStatus::Complete));
        assert!(summary.is_successful());

        summary.interrupted = true;
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_error_type_from_folio_error() {
        let cases = [
            (FolioError::subject_set("r", "x"), ExportErrorType::SubjectSet),
            (FolioError::template("r", "x"), ExportErrorType::Template),
            (FolioError::output("/x", "denied"), ExportErrorType::Output),
            (
                FolioError::Configuration("x".to_string()),
                ExportErrorType::Configuration,
            ),
            (FolioError::Other("x".to_string()), ExportErrorType::Unknown),
        ];
        for (error, expected) in cases {
            assert_eq!(ExportErrorType::from(&error), expected);
        }
    }
}
