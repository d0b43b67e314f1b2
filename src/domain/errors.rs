//! Domain error types
//!
//! This module defines the error hierarchy for Folio. Errors that escape a
//! render call are the ones raised outside template evaluation; evaluation
//! errors are written into the artifact instead.

use thiserror::Error;

/// Main Folio error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The templating runtime could not be initialized
    #[error("Template runtime initialization failed: {0}")]
    RuntimeInit(String),

    /// A report definition failed to produce its subject set
    #[error("Subject set generation failed for report '{report}': {message}")]
    SubjectSetGeneration { report: String, message: String },

    /// A report definition failed to produce its template body
    #[error("Template retrieval failed for report '{report}': {message}")]
    Template { report: String, message: String },

    /// Template evaluation failed
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Output path could not be resolved or opened
    #[error("Output error for {path}: {message}")]
    Output { path: String, message: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl FolioError {
    /// Creates a subject set generation error for the named report
    pub fn subject_set(report: impl Into<String>, message: impl Into<String>) -> Self {
        FolioError::SubjectSetGeneration {
            report: report.into(),
            message: message.into(),
        }
    }

    /// Creates a template retrieval error for the named report
    pub fn template(report: impl Into<String>, message: impl Into<String>) -> Self {
        FolioError::Template {
            report: report.into(),
            message: message.into(),
        }
    }

    /// Creates an output error for the given path
    pub fn output(path: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        FolioError::Output {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for FolioError {
    fn from(err: std::io::Error) -> Self {
        FolioError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FolioError {
    fn from(err: toml::de::Error) -> Self {
        FolioError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from template evaluation errors
impl From<minijinja::Error> for FolioError {
    fn from(err: minijinja::Error) -> Self {
        FolioError::Evaluation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folio_error_display() {
        let err = FolioError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_subject_set_error_names_report() {
        let err = FolioError::subject_set("Monthly Visits", "cohort query failed");
        assert!(matches!(err, FolioError::SubjectSetGeneration { .. }));
        assert_eq!(
            err.to_string(),
            "Subject set generation failed for report 'Monthly Visits': cohort query failed"
        );
    }

    #[test]
    fn test_output_error_includes_path() {
        let err = FolioError::output("/data/dataExports/x_en_us", "permission denied");
        assert!(err.to_string().contains("/data/dataExports/x_en_us"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: FolioError = io_err.into();
        assert!(matches!(err, FolioError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: FolioError = json_err.into();
        assert!(matches!(err, FolioError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: FolioError = toml_err.into();
        assert!(matches!(err, FolioError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_minijinja_error_conversion() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, "boom");
        let err: FolioError = mj_err.into();
        assert!(matches!(err, FolioError::Evaluation(_)));
    }

    #[test]
    fn test_folio_error_implements_std_error() {
        let err = FolioError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
