//! Template rendering
//!
//! - [`runtime`] - Process-wide templating runtime, initialized once
//! - [`context`] - Per-call evaluation context
//! - [`functions`] - Helper-function namespace exposed as `fn`
//! - [`masking`] - Exception handling for helper method calls
//! - [`diagnostic`] - Inline diagnostic block for failed evaluations
//! - [`engine`] - Renders one report definition to its artifact

pub mod context;
pub mod diagnostic;
pub mod engine;
pub mod functions;
pub mod masking;
pub mod runtime;

pub use context::EvaluationContext;
pub use engine::{RenderOutcome, RenderScope, RenderStatus, ReportRenderer};
pub use functions::{HelperFunctions, HelperRegistry};
pub use masking::{ExceptionMaskingPolicy, MethodExceptionHandler};
