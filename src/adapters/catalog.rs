//! File-backed report catalog
//!
//! Each `[[reports]]` entry points at a template file and a JSON file holding
//! the subject array. Relative paths resolve against the directory of the
//! configuration file.

use crate::config::{FolioConfig, ReportEntry};
use crate::domain::ids::ReportId;
use crate::domain::report::ReportDefinition;
use crate::domain::subject::DataSubjectSet;
use crate::domain::{FolioError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Report definition read from the filesystem
#[derive(Debug, Clone)]
pub struct FileReportDefinition {
    id: ReportId,
    name: String,
    template_path: PathBuf,
    subjects_path: PathBuf,
}

impl FileReportDefinition {
    /// Builds a definition from a catalog entry
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Configuration`] if the entry ID is blank.
    pub fn from_entry(entry: &ReportEntry, base_dir: &Path) -> Result<Self> {
        Ok(Self {
            id: ReportId::new(entry.id.clone()).map_err(FolioError::Configuration)?,
            name: entry.name.clone(),
            template_path: base_dir.join(&entry.template_path),
            subjects_path: base_dir.join(&entry.subjects_path),
        })
    }

    /// Template file path
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Subjects file path
    pub fn subjects_path(&self) -> &Path {
        &self.subjects_path
    }
}

impl ReportDefinition for FileReportDefinition {
    fn id(&self) -> &ReportId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn template(&self) -> Result<String> {
        fs::read_to_string(&self.template_path).map_err(|e| {
            FolioError::template(
                &self.name,
                format!("cannot read {}: {}", self.template_path.display(), e),
            )
        })
    }

    fn generate_subject_set(&self) -> Result<DataSubjectSet> {
        let json = fs::read_to_string(&self.subjects_path).map_err(|e| {
            FolioError::subject_set(
                &self.name,
                format!("cannot read {}: {}", self.subjects_path.display(), e),
            )
        })?;
        let subjects = DataSubjectSet::from_json(&json).map_err(|e| {
            FolioError::subject_set(
                &self.name,
                format!("invalid subjects in {}: {}", self.subjects_path.display(), e),
            )
        })?;
        tracing::debug!(
            report_id = %self.id,
            subjects = subjects.len(),
            "Loaded subject set"
        );
        Ok(subjects)
    }
}

/// Builds every report in the catalog, in configuration order
pub fn load_catalog(config: &FolioConfig, base_dir: &Path) -> Result<Vec<Box<dyn ReportDefinition>>> {
    config
        .reports
        .iter()
        .map(|entry| {
            FileReportDefinition::from_entry(entry, base_dir)
                .map(|d| Box::new(d) as Box<dyn ReportDefinition>)
        })
        .collect()
}
