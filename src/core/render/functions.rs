//! Helper-function namespace exposed to templates as `fn`
//!
//! Templates call helpers as methods: `{{ fn.format_date(p.birthdate, "%d/%m/%Y") }}`.
//! Every failing call is routed through the namespace's
//! [`MethodExceptionHandler`] before it reaches the evaluator.
//!
//! Built-in helpers:
//!
//! | method | arguments | result |
//! |---|---|---|
//! | `format` | value, pattern? | date or number, formatted |
//! | `format_date` | value, pattern = `%Y-%m-%d` | formatted date |
//! | `format_number` | value, decimals = 2 (at most 32) | number with locale decimal separator |
//! | `count` | sequence | length |
//! | `field` | subject, name | attribute value, error if missing |
//! | `ids` | sequence of subjects | list of `id` values |

use super::masking::MethodExceptionHandler;
use crate::domain::ids::Locale;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use minijinja::value::{from_args, Object, ValueKind};
use minijinja::{Error, ErrorKind, State, Value};
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::sync::Arc;

/// Type name reported to the exception handler
pub const NAMESPACE: &str = "HelperFunctions";

const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d";
const DEFAULT_DECIMALS: usize = 2;
/// Beyond this an `f64` carries no more digits
const MAX_DECIMALS: usize = 32;

/// Languages whose decimal separator is a comma
const COMMA_DECIMAL_LANGUAGES: &[&str] = &[
    "de", "es", "fr", "it", "nl", "pt", "ru", "pl", "sv", "da", "nb", "fi", "cs", "tr", "id",
];

/// Signature of an application-provided helper
pub type HelperFn = Arc<dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync>;

/// Extra helpers supplied by the embedding application
///
/// Registered helpers take precedence over built-ins of the same name.
#[derive(Clone, Default)]
pub struct HelperRegistry {
    helpers: BTreeMap<String, HelperFn>,
}

impl HelperRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a helper under a method name
    pub fn register<F>(&mut self, name: impl Into<String>, helper: F)
    where
        F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.helpers.insert(name.into(), Arc::new(helper));
    }

    /// Looks up a helper
    pub fn get(&self, name: &str) -> Option<&HelperFn> {
        self.helpers.get(name)
    }

    /// Registered helper names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }
}

impl fmt::Debug for HelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.helpers.keys()).finish()
    }
}

/// Helper namespace instance, built fresh for each render
#[derive(Debug)]
pub struct HelperFunctions {
    locale: Locale,
    handler: Arc<dyn MethodExceptionHandler>,
    extra: HelperRegistry,
}

impl HelperFunctions {
    /// Creates a namespace bound to a locale and an exception handler
    pub fn new(
        locale: Locale,
        handler: Arc<dyn MethodExceptionHandler>,
        extra: HelperRegistry,
    ) -> Self {
        Self {
            locale,
            handler,
            extra,
        }
    }

    /// Locale the namespace formats for
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, Error> {
        if let Some(helper) = self.extra.get(method) {
            return helper(args);
        }

        match method {
            "format" => {
                let (value, pattern): (Value, Option<String>) = from_args(args)?;
                self.format(&value, pattern.as_deref())
            }
            "format_date" => {
                let (value, pattern): (Value, Option<String>) = from_args(args)?;
                format_date(&value, pattern.as_deref().unwrap_or(DEFAULT_DATE_PATTERN))
                    .map(Value::from)
            }
            "format_number" => {
                let (value, decimals): (Value, Option<usize>) = from_args(args)?;
                self.format_number(&value, decimals.unwrap_or(DEFAULT_DECIMALS))
                    .map(Value::from)
            }
            "count" => {
                let (value,): (Value,) = from_args(args)?;
                count(&value).map(Value::from)
            }
            "field" => {
                let (subject, name): (Value, String) = from_args(args)?;
                field(&subject, &name)
            }
            "ids" => {
                let (value,): (Value,) = from_args(args)?;
                ids(&value)
            }
            _ => Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("{NAMESPACE} has no method '{method}'"),
            )),
        }
    }

    /// Formats a number or a date-like string
    fn format(&self, value: &Value, pattern: Option<&str>) -> Result<Value, Error> {
        match value.kind() {
            ValueKind::Number => {
                let decimals = match pattern {
                    Some(p) => decimals_from_pattern(p)?,
                    None => DEFAULT_DECIMALS,
                };
                self.format_number(value, decimals).map(Value::from)
            }
            ValueKind::String => {
                format_date(value, pattern.unwrap_or(DEFAULT_DATE_PATTERN)).map(Value::from)
            }
            _ => Err(invalid(format!("cannot format a value of kind {}", value.kind()))),
        }
    }

    fn format_number(&self, value: &Value, decimals: usize) -> Result<String, Error> {
        if decimals > MAX_DECIMALS {
            return Err(invalid(format!(
                "{decimals} decimal places requested, at most {MAX_DECIMALS} allowed"
            )));
        }
        let number = as_number(value)?;
        let formatted = format!("{:.*}", decimals, number);
        if COMMA_DECIMAL_LANGUAGES.contains(&self.locale.language()) {
            Ok(formatted.replace('.', ","))
        } else {
            Ok(formatted)
        }
    }
}

impl Object for HelperFunctions {
    fn call_method(
        self: &Arc<Self>,
        _state: &State,
        method: &str,
        args: &[Value],
    ) -> Result<Value, Error> {
        match self.invoke(method, args) {
            Ok(value) => Ok(value),
            Err(err) => self.handler.method_exception(NAMESPACE, method, err),
        }
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidOperation, message.into())
}

/// Counts decimal places in a pattern such as `0.00`
fn decimals_from_pattern(pattern: &str) -> Result<usize, Error> {
    match pattern.split_once('.') {
        Some((_, fraction)) if fraction.chars().all(|c| c == '0' || c == '#') => {
            Ok(fraction.len())
        }
        None if pattern.chars().all(|c| c == '0' || c == '#') => Ok(0),
        _ => Err(invalid(format!("invalid number pattern '{pattern}'"))),
    }
}

fn as_number(value: &Value) -> Result<f64, Error> {
    match value.kind() {
        ValueKind::Number => f64::try_from(value.clone()),
        ValueKind::String => {
            let raw = value.as_str().unwrap_or_default().trim();
            raw.parse::<f64>()
                .map_err(|_| invalid(format!("'{raw}' is not a number")))
        }
        kind => Err(invalid(format!("cannot format a value of kind {kind} as a number"))),
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formats a date-like string with a strftime pattern
fn format_date(value: &Value, pattern: &str) -> Result<String, Error> {
    let raw = value
        .as_str()
        .ok_or_else(|| invalid(format!("cannot format a value of kind {} as a date", value.kind())))?;
    let datetime =
        parse_datetime(raw).ok_or_else(|| invalid(format!("'{raw}' is not a valid date")))?;

    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid(format!("invalid date pattern '{pattern}'")));
    }

    let mut out = String::new();
    write!(out, "{}", datetime.format_with_items(items.into_iter()))
        .map_err(|_| invalid(format!("date pattern '{pattern}' cannot be applied")))?;
    Ok(out)
}

fn count(value: &Value) -> Result<usize, Error> {
    match value.kind() {
        ValueKind::Seq | ValueKind::Map | ValueKind::Iterable => value
            .len()
            .or_else(|| value.try_iter().ok().map(|it| it.count()))
            .ok_or_else(|| invalid("value has no length")),
        kind => Err(invalid(format!("cannot count a value of kind {kind}"))),
    }
}

fn field(subject: &Value, name: &str) -> Result<Value, Error> {
    let attr = subject.get_attr(name)?;
    if attr.is_undefined() {
        return Err(invalid(format!("subject has no field '{name}'")));
    }
    Ok(attr)
}

fn ids(value: &Value) -> Result<Value, Error> {
    let iter = value
        .try_iter()
        .map_err(|_| invalid(format!("cannot list ids of a value of kind {}", value.kind())))?;
    let ids = iter
        .map(|subject| field(&subject, "id"))
        .collect::<Result<Vec<Value>, Error>>()?;
    Ok(Value::from(ids))
}
