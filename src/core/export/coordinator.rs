//! Export coordinator - renders a batch of report definitions
//!
//! Reports are rendered one after another. A failure in one report is
//! logged with its ID and name and the batch moves on; it never aborts the
//! remaining reports. A shutdown signal is checked between reports, so the
//! report in flight always finishes its artifact.

use crate::config::FolioConfig;
use crate::core::export::summary::{ExportError, ExportSummary};
use crate::core::render::{RenderScope, ReportRenderer};
use crate::domain::report::ReportDefinition;
use crate::log_error_with_context;
use std::time::Instant;
use tokio::sync::watch;

/// Export coordinator
#[derive(Debug)]
pub struct ExportCoordinator {
    renderer: ReportRenderer,
    scope: RenderScope,
    shutdown_signal: Option<watch::Receiver<bool>>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(renderer: ReportRenderer, scope: RenderScope) -> Self {
        Self {
            renderer,
            scope,
            shutdown_signal: None,
        }
    }

    /// Create a coordinator from configuration
    pub fn from_config(config: &FolioConfig) -> Self {
        Self::new(
            ReportRenderer::from_config(config),
            RenderScope::from_config(config),
        )
    }

    /// Stop between reports once `shutdown_signal` turns true
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// Renderer used for each report
    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    /// Renders every definition in order
    ///
    /// Each report generates its own subject set. Never fails: per-report
    /// errors are logged and collected in the summary.
    pub fn render_all(&self, definitions: &[Box<dyn ReportDefinition>]) -> ExportSummary {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new(definitions.len());

        tracing::info!(
            report_count = definitions.len(),
            locale = %self.scope.locale(),
            "Starting export"
        );

        for definition in definitions {
            if self.shutdown_requested() {
                tracing::warn!(
                    remaining = summary.skipped(),
                    "Shutdown requested, stopping export before next report"
                );
                summary.interrupted = true;
                break;
            }

            match self.renderer.render(definition.as_ref(), None, &self.scope) {
                Ok(outcome) => summary.record_outcome(&outcome),
                Err(e) => {
                    let context = format!(
                        "report_id={}, report_name={}",
                        definition.id(),
                        definition.name()
                    );
                    log_error_with_context!(e, context);
                    summary.record_failure(ExportError::from(&e).with_context(context));
                }
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        summary
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::OutputPathResolver;
    use crate::core::render::RenderStatus;
    use crate::domain::report::InlineReport;
    use crate::domain::subject::{DataSubject, DataSubjectSet};
    use std::fs;
    use tempfile::TempDir;

    fn coordinator(root: &std::path::Path) -> ExportCoordinator {
        ExportCoordinator::new(
            ReportRenderer::new(OutputPathResolver::new(root, "dataExports")),
            RenderScope::default(),
        )
    }

    fn report(id: &str, name: &str, template: &str) -> Box<dyn ReportDefinition> {
        Box::new(
            InlineReport::new(id, name, template)
                .unwrap()
                .with_generator(|| {
                    Ok(DataSubjectSet::from_subjects(vec![
                        DataSubject::new("p-1").unwrap()
                    ]))
                }),
        )
    }

    #[test]
    fn test_render_all_isolates_failures() {
        let temp_dir = TempDir::new().unwrap();
        let definitions: Vec<Box<dyn ReportDefinition>> = vec![
            report("a", "First", "{{ patientSet | length }}"),
            Box::new(
                InlineReport::new("b", "Second", "unused")
                    .unwrap()
                    .with_generator(|| Err("cohort query failed".to_string())),
            ),
            report("c", "Third", "{{ fn.field(patientSet[0], 'missing') }}"),
        ];

        let summary = coordinator(temp_dir.path()).render_all(&definitions);

        assert_eq!(summary.total_reports, 3);
        assert_eq!(summary.rendered, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.partial, 1);
        assert_eq!(summary.artifacts.len(), 2);
        assert!(summary.errors[0]
            .context
            .as_deref()
            .unwrap()
            .contains("report_name=Second"));
        assert!(matches!(
            summary.artifacts[1].status,
            RenderStatus::Partial { .. }
        ));

        let exports = temp_dir.path().join("dataExports");
        assert_eq!(fs::read_to_string(exports.join("First_en_us")).unwrap(), "1");
        assert_eq!(fs::read_to_string(exports.join("Second_en_us")).unwrap(), "");
        assert!(exports.join("Third_en_us").exists());
    }

    #[test]
    fn test_render_all_stops_on_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let definitions = vec![report("a", "First", "x")];
        let summary = coordinator(temp_dir.path())
            .with_shutdown_signal(rx)
            .render_all(&definitions);

        assert!(summary.interrupted);
        assert_eq!(summary.skipped(), 1);
        assert!(summary.artifacts.is_empty());
    }

    #[test]
    fn test_render_all_empty_batch() {
        let temp_dir = TempDir::new().unwrap();
        let summary = coordinator(temp_dir.path()).render_all(&[]);

        assert_eq!(summary.total_reports, 0);
        assert!(summary.is_successful());
    }
}
