//! Export command implementation
//!
//! This module implements the `export` command, which renders every report in
//! the catalog (or a selected subset) to its artifact.

use super::config_base_dir;
use crate::adapters::load_catalog;
use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::core::render::RenderStatus;
use crate::domain::ids::Locale;
use crate::domain::report::ReportDefinition;
use clap::Args;
use std::collections::HashSet;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Report ID(s) to export (comma-separated); defaults to the whole catalog
    #[arg(long)]
    pub report: Option<String>,

    /// Override the locale reports are rendered under
    #[arg(long)]
    pub locale: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(locale) = &self.locale {
            match Locale::new(locale.clone()) {
                Ok(locale) => {
                    tracing::info!(locale = %locale, "Overriding locale from CLI");
                    config.export.locale = locale;
                }
                Err(e) => {
                    eprintln!("Invalid locale: {e}");
                    return Ok(2);
                }
            }
        }

        let catalog = match load_catalog(&config, &config_base_dir(config_path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load report catalog: {e}");
                return Ok(2);
            }
        };

        let definitions = match select_reports(catalog, self.report.as_deref()) {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "Invalid report selection");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        if definitions.is_empty() {
            println!("No reports to export.");
            return Ok(0);
        }

        let coordinator = ExportCoordinator::from_config(&config).with_shutdown_signal(shutdown_signal);

        println!(
            "🚀 Exporting {} report(s) to {}",
            definitions.len(),
            coordinator.renderer().resolver().exports_dir().display()
        );
        println!();

        // Rendering does blocking file IO
        let summary =
            match tokio::task::spawn_blocking(move || coordinator.render_all(&definitions)).await {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Export task failed");
                    eprintln!("Export failed: {e}");
                    return Ok(5); // Fatal error exit code
                }
            };

        print_summary(&summary);

        // Determine exit code
        let exit_code = if summary.interrupted {
            println!("⚠️  Export interrupted gracefully. Remaining reports were skipped.");
            tracing::info!("Export interrupted by user signal");
            130 // SIGINT exit code (standard Unix convention)
        } else if summary.is_successful() {
            println!("✅ Export completed successfully!");
            0
        } else {
            println!("⚠️  Export completed with failures");
            1
        };

        Ok(exit_code)
    }
}

/// Keeps the catalog entries named in `selection`, preserving catalog order
///
/// # Errors
///
/// Returns an error naming every requested ID that is not in the catalog.
pub fn select_reports(
    catalog: Vec<Box<dyn ReportDefinition>>,
    selection: Option<&str>,
) -> Result<Vec<Box<dyn ReportDefinition>>, String> {
    let Some(selection) = selection else {
        return Ok(catalog);
    };

    let wanted: HashSet<&str> = selection
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let known: HashSet<&str> = catalog.iter().map(|d| d.id().as_str()).collect();
    let mut unknown: Vec<&str> = wanted.difference(&known).copied().collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(format!("Unknown report id(s): {}", unknown.join(", ")));
    }

    Ok(catalog
        .into_iter()
        .filter(|d| wanted.contains(d.id().as_str()))
        .collect())
}

fn print_summary(summary: &ExportSummary) {
    println!("📊 Export Summary:");
    println!("  Total Reports: {}", summary.total_reports);
    println!("  Rendered: {}", summary.rendered);
    println!("  Partial: {}", summary.partial);
    println!("  Failed: {}", summary.failed);
    if summary.interrupted {
        println!("  Skipped: {}", summary.skipped());
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    for artifact in &summary.artifacts {
        let marker = match artifact.status {
            RenderStatus::Complete => "✓",
            RenderStatus::Partial { .. } => "!",
        };
        println!("  {marker} {}", artifact.path.display());
    }
    if !summary.artifacts.is_empty() {
        println!();
    }

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::InlineReport;

    fn catalog() -> Vec<Box<dyn ReportDefinition>> {
        ["a", "b", "c"]
            .into_iter()
            .map(|id| {
                Box::new(InlineReport::new(id, format!("Report {id}"), "").unwrap())
                    as Box<dyn ReportDefinition>
            })
            .collect()
    }

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs::default();

        assert!(args.report.is_none());
        assert!(args.locale.is_none());
    }

    #[test]
    fn test_select_all_without_selection() {
        let selected = select_reports(catalog(), None).unwrap();
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn test_select_subset_keeps_catalog_order() {
        let selected = select_reports(catalog(), Some("c, a")).unwrap();
        let ids: Vec<&str> = selected.iter().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_select_unknown_report() {
        let err = select_reports(catalog(), Some("a,zz,yy")).err().unwrap();
        assert_eq!(err, "Unknown report id(s): yy, zz");
    }
}
