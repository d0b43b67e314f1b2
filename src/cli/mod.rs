//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Folio using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Folio - templated report export renderer
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
#[command(author = "Folio Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "folio.toml", env = "FOLIO_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FOLIO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every report in the catalog to its artifact
    Export(commands::export::ExportArgs),

    /// Render a single report
    Render(commands::render::RenderArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
