//! Helper-function exception masking
//!
//! When a helper method fails during evaluation, the engine asks a
//! [`MethodExceptionHandler`] what to do: substitute a value and carry on, or
//! re-raise the error and abort evaluation.
//!
//! [`ExceptionMaskingPolicy`] silences failures of formatting methods, which
//! routinely fail on malformed or missing input data, and re-raises every
//! other failure unchanged.
//!
//! Classification goes by literal method name, not by error category. A helper
//! that happens to be called `format` is masked whatever it does, and a
//! formatting helper under a name missing from [`FORMATTING_METHODS`] is not.

use minijinja::{Error, Value};
use std::fmt;

/// Method names treated as formatting operations
pub const FORMATTING_METHODS: &[&str] = &["format", "format_date", "format_number"];

/// Decides the fate of a failed helper method call
pub trait MethodExceptionHandler: Send + Sync + fmt::Debug {
    /// Called with the namespace type, the method name and the raised error
    ///
    /// Returning `Ok` substitutes the value for the call result; returning
    /// `Err` aborts evaluation with that error.
    fn method_exception(&self, namespace: &str, method: &str, error: Error) -> Result<Value, Error>;
}

/// Category a method falls into under the masking policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodClass {
    /// Listed in the formatting table; failures are masked
    Formatting,
    /// Anything else; failures propagate
    Other,
}

/// Masks formatting failures, propagates everything else
#[derive(Debug, Clone)]
pub struct ExceptionMaskingPolicy {
    formatting_methods: &'static [&'static str],
}

impl ExceptionMaskingPolicy {
    /// Policy over the default formatting table
    pub fn new() -> Self {
        Self {
            formatting_methods: FORMATTING_METHODS,
        }
    }

    /// Classifies a method name
    pub fn classify(&self, method: &str) -> MethodClass {
        if self.formatting_methods.contains(&method) {
            MethodClass::Formatting
        } else {
            MethodClass::Other
        }
    }
}

impl Default for ExceptionMaskingPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodExceptionHandler for ExceptionMaskingPolicy {
    fn method_exception(&self, namespace: &str, method: &str, error: Error) -> Result<Value, Error> {
        tracing::debug!(
            namespace = namespace,
            method = method,
            error = %error,
            "Helper method raised"
        );

        match self.classify(method) {
            MethodClass::Formatting => Ok(Value::from("")),
            MethodClass::Other => Err(error),
        }
    }
}
