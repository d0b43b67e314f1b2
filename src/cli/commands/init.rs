//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "folio.toml")]
    pub output: String,

    /// Include an example report and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Folio configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Add a [[reports]] entry per report template");
                println!("  3. Validate configuration: folio validate-config");
                println!("  4. Run export: folio export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Folio Configuration File
# Templated report export renderer

[application]
log_level = "info"
data_root = "/var/lib/folio"

[export]
locale = "en_US"
exports_dir = "dataExports"

[templates]
strict_undefined = false

[logging]
local_enabled = true
local_path = "/var/log/folio"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with an example report
    fn generate_config_with_examples() -> String {
        r#"# Folio Configuration File
# Templated report export renderer
#
# Any value may reference environment variables as ${VAR_NAME}.
# FOLIO_* environment variables override the matching keys
# (for example FOLIO_EXPORT_LOCALE overrides export.locale).

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"
# Artifacts are written to <data_root>/<export.exports_dir>
data_root = "/var/lib/folio"

[export]
# Locale exposed to templates as `locale` and appended to artifact names
locale = "en_US"
# Who exports run on behalf of (recorded in logs)
actor = "reporting"
exports_dir = "dataExports"
# Template characters logged when evaluation fails
template_preview_chars = 3500

[templates]
# Shared macros, importable as {% import "macros" as m %}
# macros_path = "templates/macros.j2"
# Fail on undefined variables instead of rendering them empty
strict_undefined = false

[logging]
local_enabled = true
local_path = "/var/log/folio"
local_rotation = "daily"  # daily | hourly

# Report catalog. Relative paths resolve against this file's directory.
[[reports]]
id = "monthly-visits"
name = "Monthly Visits"
template_path = "reports/monthly_visits.j2"
subjects_path = "reports/monthly_visits.json"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FolioConfig;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "folio.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "folio.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config() {
        let config: FolioConfig = toml::from_str(&InitArgs::generate_minimal_config()).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.reports.is_empty());
    }

    #[test]
    fn test_generate_config_with_examples() {
        let config: FolioConfig =
            toml::from_str(&InitArgs::generate_config_with_examples()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.reports.len(), 1);
        assert_eq!(config.export.actor.as_deref(), Some("reporting"));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("folio.toml");
        fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");
    }
}
