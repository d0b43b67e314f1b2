//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod export;
pub mod init;
pub mod render;
pub mod validate;

use std::path::{Path, PathBuf};

/// Directory catalog paths in the configuration file are relative to
pub(crate) fn config_base_dir(config_path: &str) -> PathBuf {
    Path::new(config_path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
