//! Per-render evaluation context
//!
//! Names visible inside a template during one render call. Built fresh for
//! every call and dropped when the call returns.

use super::functions::HelperFunctions;
use crate::domain::ids::Locale;
use crate::domain::subject::DataSubjectSet;
use minijinja::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Variable holding the active locale identifier
pub const LOCALE_VAR: &str = "locale";

/// Variable holding the helper-function namespace
pub const HELPERS_VAR: &str = "fn";

/// Variable holding the data subject set
pub const SUBJECTS_VAR: &str = "patientSet";

/// Mapping from variable name to value for one evaluation
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct EvaluationContext {
    vars: BTreeMap<&'static str, Value>,
}

impl EvaluationContext {
    /// Builds the context from its three parts
    pub fn new(locale: &Locale, helpers: HelperFunctions, subjects: &DataSubjectSet) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert(LOCALE_VAR, Value::from(locale.as_str()));
        vars.insert(HELPERS_VAR, Value::from_object(helpers));
        vars.insert(SUBJECTS_VAR, Value::from_serialize(subjects));
        Self { vars }
    }

    /// Looks up a variable
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Variable names in the context
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.vars.keys().copied()
    }
}
