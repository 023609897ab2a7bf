//! Shared form state

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Value of a single form field.
///
/// Fields are dynamically typed: one form may mix strings, numbers, flags
/// and lists, so values are plain JSON values.
pub type FieldValue = serde_json::Value;

/// Field id -> current value
pub type Values = HashMap<String, FieldValue>;

/// Field id -> error message. An empty string means "no error".
pub type Errors = HashMap<String, String>;

pub(crate) static NULL_VALUE: FieldValue = FieldValue::Null;

/// Values and errors of one form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default)]
    pub values: Values,
    #[serde(default)]
    pub errors: Errors,
}

impl FormState {
    /// Build the construction snapshot: the given values, and an empty
    /// error for every one of them.
    pub fn from_initial_values(values: Values) -> Self {
        let errors = values.keys().map(|id| (id.clone(), String::new())).collect();
        Self { values, errors }
    }

    /// Value of `id`, or `Null` if the field is unknown
    pub fn value(&self, id: &str) -> &FieldValue {
        self.values.get(id).unwrap_or(&NULL_VALUE)
    }

    /// Error of `id`, if one was ever set (possibly empty)
    pub fn error(&self, id: &str) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    /// True when at least one field carries a non-empty message
    pub fn has_errors(&self) -> bool {
        self.errors.values().any(|e| !e.is_empty())
    }

    /// Ids whose value or error differs between `self` and `other`.
    ///
    /// A key present on one side only counts as changed.
    pub fn changed_ids(&self, other: &FormState) -> HashSet<String> {
        let mut changed = HashSet::new();
        diff_into(&self.values, &other.values, &mut changed);
        diff_into(&self.errors, &other.errors, &mut changed);
        changed
    }
}

fn diff_into<V: PartialEq>(
    a: &HashMap<String, V>,
    b: &HashMap<String, V>,
    changed: &mut HashSet<String>,
) {
    for (id, value) in a {
        if b.get(id) != Some(value) {
            changed.insert(id.clone());
        }
    }
    for id in b.keys() {
        if !a.contains_key(id) {
            changed.insert(id.clone());
        }
    }
}
