//! Process-wide templating runtime
//!
//! The MiniJinja environment is built once per process, on first use. If
//! building it fails, the failure is logged and the caller gets a degraded
//! environment for that call; the next call tries again.

use crate::config::TemplatesConfig;
use crate::domain::{FolioError, Result};
use minijinja::{Environment, UndefinedBehavior};
use once_cell::sync::OnceCell;
use std::fs;
use std::ops::Deref;

/// Name shared macros are registered under
pub const MACROS_TEMPLATE: &str = "macros";

static RUNTIME: OnceCell<Environment<'static>> = OnceCell::new();

/// Environment handle used for one render call
#[derive(Debug)]
pub enum TemplateRuntime {
    /// The initialized process-wide environment
    Shared(&'static Environment<'static>),
    /// Fallback used when initialization failed
    Degraded(Box<Environment<'static>>),
}

impl TemplateRuntime {
    /// Whether this handle is the fallback environment
    pub fn is_degraded(&self) -> bool {
        matches!(self, TemplateRuntime::Degraded(_))
    }
}

impl Deref for TemplateRuntime {
    type Target = Environment<'static>;

    fn deref(&self) -> &Self::Target {
        match self {
            TemplateRuntime::Shared(env) => *env,
            TemplateRuntime::Degraded(env) => env.as_ref(),
        }
    }
}

/// Returns the process-wide runtime, initializing it on first use
///
/// Only the first successful initialization applies `config`.
pub fn acquire(config: &TemplatesConfig) -> TemplateRuntime {
    acquire_from(&RUNTIME, config)
}

/// Whether the process-wide runtime has been initialized
pub fn is_initialized() -> bool {
    RUNTIME.get().is_some()
}

fn acquire_from(
    cell: &'static OnceCell<Environment<'static>>,
    config: &TemplatesConfig,
) -> TemplateRuntime {
    match cell.get_or_try_init(|| build_environment(config)) {
        Ok(env) => TemplateRuntime::Shared(env),
        Err(e) => {
            tracing::error!(error = %e, "Error initializing template runtime");
            TemplateRuntime::Degraded(Box::new(base_environment()))
        }
    }
}

/// Builds a fully configured environment
///
/// # Errors
///
/// Returns [`FolioError::RuntimeInit`] if the shared macros file cannot be
/// read or does not compile.
pub fn build_environment(config: &TemplatesConfig) -> Result<Environment<'static>> {
    let mut env = base_environment();

    if config.strict_undefined {
        env.set_undefined_behavior(UndefinedBehavior::Strict);
    }

    if let Some(path) = &config.macros_path {
        let source = fs::read_to_string(path).map_err(|e| {
            FolioError::RuntimeInit(format!("cannot read macros {}: {}", path.display(), e))
        })?;
        env.add_template_owned(MACROS_TEMPLATE, source).map_err(|e| {
            FolioError::RuntimeInit(format!("cannot compile macros {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Loaded shared template macros");
    }

    tracing::info!(
        strict_undefined = config.strict_undefined,
        macros = config.macros_path.is_some(),
        "Template runtime initialized"
    );

    Ok(env)
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_debug(true);
    env.set_keep_trailing_newline(true);
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_is_shared() {
        let config = TemplatesConfig::default();
        let first = acquire(&config);
        let second = acquire(&config);

        assert!(is_initialized());
        match (first, second) {
            (TemplateRuntime::Shared(a), TemplateRuntime::Shared(b)) => {
                assert!(std::ptr::eq(a, b))
            }
            _ => panic!("expected the shared runtime"),
        }
    }

    #[test]
    fn test_build_environment_missing_macros() {
        let config = TemplatesConfig {
            macros_path: Some(PathBuf::from("/nonexistent/folio/macros.j2")),
            strict_undefined: false,
        };
        let err = build_environment(&config).unwrap_err();
        assert!(matches!(err, FolioError::RuntimeInit(_)));
    }

    #[test]
    fn test_build_environment_loads_macros() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("macros.j2");
        fs::write(&path, "{% macro shout(s) %}{{ s | upper }}{% endmacro %}").unwrap();

        let env = build_environment(&TemplatesConfig {
            macros_path: Some(path),
            strict_undefined: false,
        })
        .unwrap();

        let out = env
            .render_str(r#"{% import "macros" as m %}{{ m.shout("hi") }}"#, ())
            .unwrap();
        assert_eq!(out, "HI");
    }

    #[test]
    fn test_build_environment_rejects_broken_macros() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("macros.j2");
        fs::write(&path, "{% macro broken( %}").unwrap();

        let result = build_environment(&TemplatesConfig {
            macros_path: Some(path),
            strict_undefined: false,
        });
        assert!(matches!(result, Err(FolioError::RuntimeInit(_))));
    }

    #[test]
    fn test_failed_init_degrades_and_retries() {
        static CELL: OnceCell<Environment<'static>> = OnceCell::new();
        let broken = TemplatesConfig {
            macros_path: Some(PathBuf::from("/nonexistent/folio/macros.j2")),
            strict_undefined: false,
        };

        let runtime = acquire_from(&CELL, &broken);
        assert!(runtime.is_degraded());
        assert_eq!(runtime.render_str("{{ 1 + 1 }}", ()).unwrap(), "2");
        assert!(CELL.get().is_none());

        let runtime = acquire_from(&CELL, &TemplatesConfig::default());
        assert!(!runtime.is_degraded());
        assert!(CELL.get().is_some());
    }

    #[test]
    fn test_strict_undefined() {
        let env = build_environment(&TemplatesConfig {
            macros_path: None,
            strict_undefined: true,
        })
        .unwrap();
        assert!(env.render_str("{{ missing }}", ()).is_err());
    }

    #[test]
    fn test_keeps_trailing_newline() {
        let env = build_environment(&TemplatesConfig::default()).unwrap();
        assert_eq!(env.render_str("line\n", ()).unwrap(), "line\n");
    }
}
