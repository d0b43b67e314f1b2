//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Folio configuration file and its report catalog.

use super::config_base_dir;
use crate::adapters::FileReportDefinition;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config also validates
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Data Root: {}", config.application.data_root.display());
        println!("  Exports Dir: {}", config.export.exports_dir);
        println!("  Locale: {}", config.export.locale);
        println!(
            "  Actor: {}",
            config.export.actor.as_deref().unwrap_or("(none)")
        );
        match &config.templates.macros_path {
            Some(path) => println!("  Shared Macros: {}", path.display()),
            None => println!("  Shared Macros: (none)"),
        }
        println!("  Strict Undefined: {}", config.templates.strict_undefined);
        println!("  Reports: {}", config.reports.len());

        // Missing catalog files are reported, not fatal: they surface per report at export time
        let base_dir = config_base_dir(config_path);
        let mut missing = 0;
        for entry in &config.reports {
            let definition = FileReportDefinition::from_entry(entry, &base_dir)?;
            println!("    - {} ({})", entry.id, entry.name);
            for path in [definition.template_path(), definition.subjects_path()] {
                if !path.exists() {
                    missing += 1;
                    println!("      ⚠️  missing file: {}", path.display());
                }
            }
        }
        println!();

        if missing > 0 {
            tracing::warn!(missing_files = missing, "Report catalog references missing files");
        }
        Ok(0)
    }
}
