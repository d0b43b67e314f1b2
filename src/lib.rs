// Folio - Templated report export renderer
// Copyright (c) 2025 Folio Contributors
// Licensed under the MIT License

//! # Folio - Templated Report Export Renderer
//!
//! Folio renders report definitions to text artifacts. Each report pairs a
//! template with a set of data subjects; the rendered output is written to a
//! deterministic file under the exports directory.
//!
//! ## Overview
//!
//! - **Runtime**: one process-wide MiniJinja environment, built on first use
//! - **Context**: every render sees `locale`, `fn` (helper functions) and `patientSet`
//! - **Masking**: formatting helpers that fail render as empty text
//! - **Diagnostics**: other evaluation failures are written into the artifact,
//!   after whatever output was already produced
//! - **Batch**: a failing report never stops the rest of the batch
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Rendering engine, output paths and batch export
//! - [`adapters`] - File-backed report catalog
//! - [`domain`] - Report definitions, data subjects, identifiers and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio::core::output::OutputPathResolver;
//! use folio::core::render::{RenderScope, ReportRenderer};
//! use folio::domain::report::InlineReport;
//! use folio::domain::subject::{DataSubject, DataSubjectSet};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = InlineReport::new(
//!     "census",
//!     "Daily Census",
//!     "{% for p in patientSet %}{{ p.id }}\n{% endfor %}",
//! )?;
//! let subjects = DataSubjectSet::from_subjects(vec![DataSubject::new("p-1")?]);
//!
//! let renderer = ReportRenderer::new(OutputPathResolver::new("/var/lib/folio", "dataExports"));
//! let outcome = renderer.render(&report, Some(subjects), &RenderScope::default())?;
//!
//! // /var/lib/folio/dataExports/Daily_Census_en_us
//! println!("{} ({})", outcome.path.display(), outcome.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Folio uses [`domain::FolioError`] for all errors. A render call only fails
//! for problems outside template evaluation, such as an unwritable output
//! path or a subject set that cannot be generated.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
