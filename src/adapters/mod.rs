//! Integrations that supply report definitions
//!
//! - [`catalog`] - Report definitions backed by template and subject files

pub mod catalog;

pub use catalog::{load_catalog, FileReportDefinition};
