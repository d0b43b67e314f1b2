//! Data subject domain model
//!
//! A data subject is one record a report iterates over (typically a patient).
//! The set is exposed to templates as a plain sequence of objects, each with
//! an `id` plus its attributes.

use super::ids::SubjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single subject record
///
/// # Examples
///
/// ```
/// use folio::domain::subject::DataSubject;
/// use serde_json::json;
///
/// let subject = DataSubject::new("p-1")
///     .unwrap()
///     .with_attribute("birthdate", json!("1980-04-12"));
/// assert_eq!(subject.attribute("birthdate"), Some(&json!("1980-04-12")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSubject {
    /// Subject identifier
    pub id: SubjectId,

    /// Arbitrary attributes visible to templates
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl DataSubject {
    /// Creates a subject with no attributes
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        Ok(Self {
            id: SubjectId::new(id)?,
            attributes: BTreeMap::new(),
        })
    }

    /// Adds an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Looks up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

/// Ordered collection of subjects handed to a template as `patientSet`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSubjectSet {
    subjects: Vec<DataSubject>,
}

impl DataSubjectSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from subjects, preserving their order
    pub fn from_subjects(subjects: Vec<DataSubject>) -> Self {
        Self { subjects }
    }

    /// Parses a JSON array of subject objects
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Appends a subject
    pub fn push(&mut self, subject: DataSubject) {
        self.subjects.push(subject);
    }

    /// Number of subjects
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the set holds no subjects
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Iterates subjects in order
    pub fn iter(&self) -> std::slice::Iter<'_, DataSubject> {
        self.subjects.iter()
    }

    /// Subject identifiers in order
    pub fn ids(&self) -> Vec<&SubjectId> {
        self.subjects.iter().map(|s| &s.id).collect()
    }
}

impl FromIterator<DataSubject> for DataSubjectSet {
    fn from_iter<I: IntoIterator<Item = DataSubject>>(iter: I) -> Self {
        Self {
            subjects: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DataSubjectSet {
    type Item = &'a DataSubject;
    type IntoIter = std::slice::Iter<'a, DataSubject>;

    fn into_iter(self) -> Self::IntoIter {
        self.subjects.iter()
    }
}
