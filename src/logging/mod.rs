//! Logging and observability
//!
//! Compact console logging and optional JSON file logs, both keyed by the
//! per-report `render` span, plus the render event macros.
//!
//! # Example
//!
//! ```no_run
//! use folio::logging::init_logging;
//! use folio::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a report render
///
/// # Example
///
/// ```no_run
/// use folio::log_render_start;
/// use folio::domain::ids::{Locale, ReportId};
///
/// let report_id = ReportId::new("monthly-visits").unwrap();
/// let locale = Locale::default();
/// log_render_start!(&report_id, "Monthly Visits", &locale);
/// ```
#[macro_export]
macro_rules! log_render_start {
    ($report_id:expr, $report_name:expr, $locale:expr) => {
        tracing::info!(
            report_id = %$report_id,
            report_name = %$report_name,
            locale = %$locale,
            "Rendering report"
        );
    };
}

/// Log the completion of a report render
///
/// # Example
///
/// ```no_run
/// use folio::log_render_complete;
/// use std::time::Duration;
///
/// log_render_complete!("/data/dataExports/Monthly_Visits_en_us", "complete", Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_render_complete {
    ($path:expr, $status:expr, $duration:expr) => {
        tracing::info!(
            path = %$path,
            status = %$status,
            duration_ms = $duration.as_millis() as u64,
            "Report rendered"
        );
    };
}

/// Log a report failure with the report it belongs to
///
/// # Example
///
/// ```no_run
/// use folio::log_error_with_context;
/// use folio::domain::FolioError;
///
/// let error = FolioError::subject_set("Monthly Visits", "cohort query failed");
/// log_error_with_context!(&error, "report_id=monthly-visits, report_name=Monthly Visits");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error rendering report"
        );
    };
}
