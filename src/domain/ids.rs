//! Domain identifier types with validation
//!
//! Newtype wrappers for report, subject and locale identifiers. Each type
//! rejects values that cannot be used safely downstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Report definition identifier
///
/// # Examples
///
/// ```
/// use folio::domain::ids::ReportId;
/// use std::str::FromStr;
///
/// let id = ReportId::from_str("monthly-visits").unwrap();
/// assert_eq!(id.as_str(), "monthly-visits");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(String);

impl ReportId {
    /// Creates a new ReportId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Report ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the report ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ReportId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Data subject identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates a new SubjectId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Subject ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the subject ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Locale identifier such as `en_US` or `fr`
///
/// The identifier is kept as given; [`Locale::file_suffix`] produces the
/// lower-cased form used in artifact names.
///
/// # Examples
///
/// ```
/// use folio::domain::ids::Locale;
///
/// let locale = Locale::new("en_US").unwrap();
/// assert_eq!(locale.as_str(), "en_US");
/// assert_eq!(locale.file_suffix(), "en_us");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Creates a new Locale
    ///
    /// Blank identifiers and identifiers containing path separators or
    /// whitespace are rejected since the locale ends up in a file name.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Locale cannot be empty".to_string());
        }
        if id
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace())
        {
            return Err(format!("Invalid locale identifier: {id:?}"));
        }
        Ok(Self(id))
    }

    /// Returns the locale as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased identifier used as the artifact file suffix
    pub fn file_suffix(&self) -> String {
        self.0.to_lowercase()
    }

    /// Language part of the identifier (`en` for `en_US`)
    pub fn language(&self) -> &str {
        self.0
            .split(['_', '-'])
            .next()
            .unwrap_or(&self.0)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en_US".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}
