//! Render command implementation
//!
//! Renders a single catalog report. With `--subjects`, the given subject set
//! is used as-is and the report's own subject source is never read.

use super::config_base_dir;
use crate::adapters::load_catalog;
use crate::config::load_config;
use crate::core::render::{RenderScope, RenderStatus, ReportRenderer};
use crate::domain::subject::DataSubjectSet;
use anyhow::Context;
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the render command
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Report ID to render
    #[arg(long)]
    pub report: String,

    /// JSON file holding a pre-fetched subject set
    #[arg(long)]
    pub subjects: Option<PathBuf>,

    /// Override the locale the report is rendered under
    #[arg(long)]
    pub locale: Option<String>,
}

impl RenderArgs {
    /// Execute the render command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(report_id = %self.report, "Starting render command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };
        if let Some(locale) = &self.locale {
            config.export.locale = match locale.parse() {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("Invalid locale: {e}");
                    return Ok(2);
                }
            };
        }

        let catalog = match load_catalog(&config, &config_base_dir(config_path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load report catalog: {e}");
                return Ok(2);
            }
        };
        let Some(definition) = catalog
            .into_iter()
            .find(|d| d.id().as_str() == self.report)
        else {
            eprintln!("Unknown report id: {}", self.report);
            return Ok(2);
        };

        let subjects = match &self.subjects {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading subjects from {}", path.display()))?;
                let subjects = DataSubjectSet::from_json(&json)
                    .with_context(|| format!("parsing subjects from {}", path.display()))?;
                Some(subjects)
            }
            None => None,
        };

        let renderer = ReportRenderer::from_config(&config);
        let scope = RenderScope::from_config(&config);

        let result =
            tokio::task::spawn_blocking(move || renderer.render(definition.as_ref(), subjects, &scope))
                .await;

        match result {
            Ok(Ok(outcome)) => {
                println!("Rendered {} ({} subjects)", outcome.path.display(), outcome.subject_count);
                match outcome.status {
                    RenderStatus::Complete => Ok(0),
                    RenderStatus::Partial { error } => {
                        println!("⚠️  Evaluation failed, diagnostic written to artifact: {error}");
                        Ok(1)
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!(report_id = %self.report, error = %e, "Render failed");
                eprintln!("Render failed: {e}");
                Ok(1)
            }
            Err(e) => {
                eprintln!("Render task failed: {e}");
                Ok(5)
            }
        }
    }
}
