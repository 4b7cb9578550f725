//! Content fields and their configuration

use serde::{Deserialize, Serialize};

/// A single resolved name/value pair of the record.
///
/// Repeatable fields expand to one `ContentField` per value, all sharing the
/// same name. Fields are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentField {
    pub name: String,
    pub value: String,
}

impl ContentField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Configured specification of one record field.
///
/// The `data` expressions are evaluated in order against the template
/// resolver; the first one that produces a usable value wins. `default`
/// applies when no expression matched, and a field without a value is
/// omitted from the record entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Element name of the field in the field-set document
    pub name: String,
    /// Template expressions tried in order
    #[serde(default)]
    pub data: Vec<String>,
    /// Static fallback when no expression resolves
    #[serde(default)]
    pub default: Option<String>,
    /// Split the resolved value on the repeat separator
    #[serde(default)]
    pub repeatable: bool,
}
