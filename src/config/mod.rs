//! Configuration management for Folio.
//!
//! Folio uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FOLIO_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use folio::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("folio.toml")?;
//!
//! println!("Data root: {}", config.application.data_root.display());
//! println!("Locale: {}", config.export.locale);
//! println!("Reports: {}", config.reports.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and application data root
//! - [`ExportConfig`] - Locale, actor, exports directory, diagnostics
//! - [`TemplatesConfig`] - Templating runtime settings
//! - [`LoggingConfig`] - Logging configuration
//! - [`ReportEntry`] - Report catalog entries
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! data_root = "/srv/folio"
//!
//! [export]
//! locale = "en_US"
//! actor = "${FOLIO_ACTOR}"
//!
//! [[reports]]
//! id = "monthly-visits"
//! name = "Monthly Visits"
//! template_path = "reports/monthly_visits.j2"
//! subjects_path = "reports/monthly_visits.json"
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ExportConfig, FolioConfig, LoggingConfig, ReportEntry, TemplatesConfig,
};
