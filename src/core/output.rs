//! Output path resolution
//!
//! Every rendered report lands at
//! `<data_root>/<exports_dir>/<report_name_with_underscores>_<locale-lowercase>`.
//! Re-rendering the same report under the same locale overwrites the previous
//! artifact.

use crate::config::FolioConfig;
use crate::domain::ids::Locale;
use crate::domain::report::ReportDefinition;
use crate::domain::{FolioError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Derives deterministic artifact paths under the exports directory
#[derive(Debug, Clone)]
pub struct OutputPathResolver {
    exports_dir: PathBuf,
}

impl OutputPathResolver {
    /// Creates a resolver writing to `<data_root>/<exports_dir>`
    pub fn new(data_root: impl AsRef<Path>, exports_dir: &str) -> Self {
        Self {
            exports_dir: data_root.as_ref().join(exports_dir),
        }
    }

    /// Creates a resolver from the application and export settings
    pub fn from_config(config: &FolioConfig) -> Self {
        Self::new(&config.application.data_root, &config.export.exports_dir)
    }

    /// Directory artifacts are written to
    pub fn exports_dir(&self) -> &Path {
        &self.exports_dir
    }

    /// Resolves the artifact path for a report under a locale
    ///
    /// Creates the exports directory if it does not exist yet. Safe to call
    /// repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Output`] if the exports directory cannot be
    /// created.
    pub fn resolve(&self, definition: &dyn ReportDefinition, locale: &Locale) -> Result<PathBuf> {
        fs::create_dir_all(&self.exports_dir)
            .map_err(|e| FolioError::output(self.exports_dir.display(), e))?;

        Ok(self.exports_dir.join(artifact_file_name(definition.name(), locale)))
    }
}

/// File name for a report rendered under a locale
///
/// Spaces and path separators become underscores, so the artifact always
/// lands directly inside the exports directory.
///
/// # Examples
///
/// ```
/// use folio::core::output::artifact_file_name;
/// use folio::domain::ids::Locale;
///
/// let locale = Locale::new("en_US").unwrap();
/// assert_eq!(artifact_file_name("Monthly Visits", &locale), "Monthly_Visits_en_us");
/// ```
pub fn artifact_file_name(report_name: &str, locale: &Locale) -> String {
    let stem: String = report_name
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("{}_{}", stem, locale.file_suffix())
}
