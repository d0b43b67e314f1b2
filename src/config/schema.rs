//! Configuration schema types
//!
//! This module defines the configuration structure for Folio.

use crate::domain::ids::Locale;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Folio configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Templating runtime settings
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Report catalog entries
    #[serde(default)]
    pub reports: Vec<ReportEntry>,
}

impl FolioConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.logging.validate()?;

        let mut seen = std::collections::HashSet::new();
        for report in &self.reports {
            report.validate()?;
            if !seen.insert(report.id.as_str()) {
                return Err(format!("Duplicate report id '{}'", report.id));
            }
        }
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Application data root; exports land in a subdirectory of it
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_root: default_data_root(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        if self.data_root.as_os_str().is_empty() {
            return Err("application.data_root cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Locale reports are rendered under
    #[serde(default)]
    pub locale: Locale,

    /// Actor the export runs on behalf of (recorded in logs only)
    #[serde(default)]
    pub actor: Option<String>,

    /// Name of the exports directory under the data root
    #[serde(default = "default_exports_dir")]
    pub exports_dir: String,

    /// Number of template characters logged when evaluation fails
    #[serde(default = "default_template_preview_chars")]
    pub template_preview_chars: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            actor: None,
            exports_dir: default_exports_dir(),
            template_preview_chars: default_template_preview_chars(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.exports_dir.trim().is_empty() {
            return Err("export.exports_dir cannot be empty".to_string());
        }
        if self.exports_dir.contains(['/', '\\']) || self.exports_dir == ".." {
            return Err(format!(
                "export.exports_dir must be a single directory name, got '{}'",
                self.exports_dir
            ));
        }
        if self.template_preview_chars == 0 {
            return Err("export.template_preview_chars must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Templating runtime configuration
///
/// Applied once, when the process-wide runtime is first initialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Optional file of shared macros, importable as `"macros"`
    #[serde(default)]
    pub macros_path: Option<PathBuf>,

    /// Fail on undefined variables instead of rendering them empty
    #[serde(default)]
    pub strict_undefined: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

/// One report in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Report identifier
    pub id: String,

    /// Report name (spaces become underscores in the artifact name)
    pub name: String,

    /// Path to the template body
    pub template_path: PathBuf,

    /// Path to a JSON array of subjects
    pub subjects_path: PathBuf,
}

impl ReportEntry {
    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("reports.id cannot be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err(format!("reports.name cannot be empty (report '{}')", self.id));
        }
        if self.template_path.as_os_str().is_empty() {
            return Err(format!(
                "reports.template_path cannot be empty (report '{}')",
                self.id
            ));
        }
        if self.subjects_path.as_os_str().is_empty() {
            return Err(format!(
                "reports.subjects_path cannot be empty (report '{}')",
                self.id
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

fn default_exports_dir() -> String {
    "dataExports".to_string()
}

fn default_template_preview_chars() -> usize {
    3500
}

fn default_true() -> bool {
    true
}

fn default_local_path() -> String {
    "/var/log/folio".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
