//! Report rendering engine
//!
//! Renders one report definition to its artifact:
//!
//! 1. Acquire the process-wide templating runtime (initialized once)
//! 2. Resolve the output path and open the artifact with truncate semantics
//! 3. Obtain the subject set and template body from the definition
//! 4. Build a fresh evaluation context (locale, `fn`, `patientSet`) whose
//!    helper namespace carries this evaluation's exception handler
//! 5. Stream the template output into the artifact
//! 6. On evaluation failure, keep the partial output and append a diagnostic block
//!
//! A definition that cannot produce its subject set or template leaves an
//! empty artifact behind and the error propagates.
//!
//! The file handle, context, subject set and helper namespace are owned by the
//! call and dropped when it returns. Per-call actor and locale live in a
//! tracing span that closes with the call.

use super::context::EvaluationContext;
use super::diagnostic::diagnostic_block;
use super::functions::{HelperFunctions, HelperRegistry};
use super::masking::{ExceptionMaskingPolicy, MethodExceptionHandler};
use super::runtime;
use crate::config::{FolioConfig, TemplatesConfig};
use crate::core::output::OutputPathResolver;
use crate::domain::ids::{Locale, ReportId};
use crate::domain::report::ReportDefinition;
use crate::domain::subject::DataSubjectSet;
use crate::domain::{FolioError, Result};
use crate::{log_render_complete, log_render_start};
use minijinja::{Environment, Value};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

const DEFAULT_TEMPLATE_PREVIEW_CHARS: usize = 3500;

/// Explicit per-call state: who the render runs for and in which locale
#[derive(Debug, Clone, Default)]
pub struct RenderScope {
    locale: Locale,
    actor: Option<String>,
}

impl RenderScope {
    /// Creates a scope for a locale with no actor
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            actor: None,
        }
    }

    /// Creates a scope from the export settings
    pub fn from_config(config: &FolioConfig) -> Self {
        Self {
            locale: config.export.locale.clone(),
            actor: config.export.actor.clone(),
        }
    }

    /// Sets the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Active locale
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Actor, if any
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

/// How a render ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    /// Template evaluated to completion
    Complete,
    /// Evaluation failed; artifact holds partial output plus a diagnostic block
    Partial {
        /// Error summary written into the artifact
        error: String,
    },
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStatus::Complete => write!(f, "complete"),
            RenderStatus::Partial { .. } => write!(f, "partial"),
        }
    }
}

/// Result of one render call
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// Report that was rendered
    pub report_id: ReportId,
    /// Artifact path
    pub path: PathBuf,
    /// Completion status
    pub status: RenderStatus,
    /// Number of subjects the template saw
    pub subject_count: usize,
    /// Whether the degraded runtime was used
    pub degraded_runtime: bool,
}

impl RenderOutcome {
    /// Whether evaluation ran to completion
    pub fn is_complete(&self) -> bool {
        self.status == RenderStatus::Complete
    }
}

/// Renders report definitions to artifacts
pub struct ReportRenderer {
    resolver: OutputPathResolver,
    templates: TemplatesConfig,
    handler: Arc<dyn MethodExceptionHandler>,
    helpers: HelperRegistry,
    template_preview_chars: usize,
}

impl ReportRenderer {
    /// Creates a renderer with the default masking policy
    pub fn new(resolver: OutputPathResolver) -> Self {
        Self {
            resolver,
            templates: TemplatesConfig::default(),
            handler: Arc::new(ExceptionMaskingPolicy::new()),
            helpers: HelperRegistry::new(),
            template_preview_chars: DEFAULT_TEMPLATE_PREVIEW_CHARS,
        }
    }

    /// Creates a renderer from configuration
    pub fn from_config(config: &FolioConfig) -> Self {
        Self::new(OutputPathResolver::from_config(config))
            .with_templates_config(config.templates.clone())
            .with_template_preview_chars(config.export.template_preview_chars)
    }

    /// Sets the runtime settings applied when the runtime is first initialized
    pub fn with_templates_config(mut self, templates: TemplatesConfig) -> Self {
        self.templates = templates;
        self
    }

    /// Replaces the helper exception handler
    pub fn with_exception_handler(mut self, handler: Arc<dyn MethodExceptionHandler>) -> Self {
        self.handler = handler;
        self
    }

    /// Registers an application helper available as `fn.<name>(...)`
    pub fn with_helper<F>(mut self, name: impl Into<String>, helper: F) -> Self
    where
        F: Fn(&[Value]) -> std::result::Result<Value, minijinja::Error> + Send + Sync + 'static,
    {
        self.helpers.register(name, helper);
        self
    }

    /// Sets how many template characters are logged on failure
    pub fn with_template_preview_chars(mut self, chars: usize) -> Self {
        self.template_preview_chars = chars;
        self
    }

    /// Output path resolver in use
    pub fn resolver(&self) -> &OutputPathResolver {
        &self.resolver
    }

    /// Renders one report
    ///
    /// Uses `subject_set` when given; otherwise asks the definition to
    /// generate it, exactly once.
    ///
    /// # Errors
    ///
    /// Only for failures outside template evaluation: the output path cannot
    /// be resolved, opened or written, or the definition fails to produce its
    /// subject set or template. In the latter case the artifact has already
    /// been truncated and is left empty. Evaluation failures are written into
    /// the artifact and reported as [`RenderStatus::Partial`].
    pub fn render(
        &self,
        definition: &dyn ReportDefinition,
        subject_set: Option<DataSubjectSet>,
        scope: &RenderScope,
    ) -> Result<RenderOutcome> {
        let span = tracing::info_span!(
            "render",
            report_id = %definition.id(),
            locale = %scope.locale(),
            actor = scope.actor().unwrap_or("-"),
        );
        let _entered = span.enter();
        let started = Instant::now();
        log_render_start!(definition.id(), definition.name(), scope.locale());

        let runtime = runtime::acquire(&self.templates);

        let path = self.resolver.resolve(definition, scope.locale())?;
        let file = File::create(&path).map_err(|e| FolioError::output(path.display(), e))?;
        let mut out = BufWriter::new(file);

        let (subjects, template) = match prepare(definition, subject_set) {
            Ok(prepared) => prepared,
            Err(err) => {
                // The artifact stays behind, truncated and empty
                if let Err(close_err) = finish(out, &path) {
                    tracing::warn!(error = %close_err, "Failed to close artifact");
                }
                return Err(err);
            }
        };
        let subject_count = subjects.len();

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                template = %template_preview(&template, self.template_preview_chars),
                "Template"
            );
        }

        let helpers = HelperFunctions::new(
            scope.locale().clone(),
            Arc::clone(&self.handler),
            self.helpers.clone(),
        );
        let context = EvaluationContext::new(scope.locale(), helpers, &subjects);
        drop(subjects);

        let status = match evaluate(&runtime, definition.id(), template.clone(), &context, &mut out)
        {
            Ok(()) => RenderStatus::Complete,
            Err(err) => {
                out.write_all(diagnostic_block(&err).as_bytes())
                    .map_err(|e| FolioError::output(path.display(), e))?;
                let failure = FolioError::from(err);
                tracing::error!(
                    report_id = %definition.id(),
                    error = %failure,
                    "Error evaluating data export"
                );
                tracing::error!(
                    template = %template_preview(&template, self.template_preview_chars),
                    "Template"
                );
                RenderStatus::Partial {
                    error: failure.to_string(),
                }
            }
        };

        finish(out, &path)?;
        drop(context);

        log_render_complete!(path.display(), status, started.elapsed());

        Ok(RenderOutcome {
            report_id: definition.id().clone(),
            path,
            status,
            subject_count,
            degraded_runtime: runtime.is_degraded(),
        })
    }
}

impl fmt::Debug for ReportRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportRenderer")
            .field("resolver", &self.resolver)
            .field("templates", &self.templates)
            .field("handler", &self.handler)
            .field("helpers", &self.helpers)
            .finish()
    }
}

/// Obtains the subject set, generating it only when none was supplied, and
/// the template body
fn prepare(
    definition: &dyn ReportDefinition,
    subject_set: Option<DataSubjectSet>,
) -> Result<(DataSubjectSet, String)> {
    let subjects = match subject_set {
        Some(subjects) => {
            tracing::debug!(subjects = subjects.len(), "Using supplied subject set");
            subjects
        }
        None => definition.generate_subject_set()?,
    };
    let template = definition.template()?;
    Ok((subjects, template))
}

/// Compiles the report template into a per-call copy of the runtime and
/// streams its output to `out`
///
/// Compilation errors count as evaluation failures.
fn evaluate<W: Write>(
    runtime: &Environment<'static>,
    report_id: &ReportId,
    template: String,
    context: &EvaluationContext,
    out: &mut W,
) -> std::result::Result<(), minijinja::Error> {
    let mut env = runtime.clone();
    env.add_template_owned(report_id.to_string(), template)?;
    let compiled = env.get_template(report_id.as_str())?;
    compiled.render_to_write(context, out)?;
    Ok(())
}

fn finish(mut out: BufWriter<File>, path: &Path) -> Result<()> {
    out.flush()
        .map_err(|e| FolioError::output(path.display(), e))?;
    let file = out
        .into_inner()
        .map_err(|e| FolioError::output(path.display(), e.error()))?;
    file.sync_all()
        .map_err(|e| FolioError::output(path.display(), e))
}

/// First `max_chars` characters of a template, for logs
fn template_preview(template: &str, max_chars: usize) -> String {
    let mut chars = template.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{preview}...")
    } else {
        preview
    }
}
