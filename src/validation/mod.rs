//! Field validation
//!
//! A [`Schema`] decides whether a single field value is acceptable. The
//! [`ValidatorRegistry`] maps field ids to schemas and is handed to a
//! [`crate::FormStore`] once, at construction.

mod rules;

pub use rules::{Rule, RuleSet};

use crate::error::ValidationError;
use crate::state::{Errors, FieldValue, Values, NULL_VALUE};
use std::collections::HashMap;
use std::fmt;

/// Synchronous validator for one field value
#[cfg_attr(test, mockall::automock)]
pub trait Schema {
    /// Accept the value, or reject it with a human-readable message
    fn validate(&self, value: &FieldValue) -> Result<(), ValidationError>;
}

impl<F> Schema for F
where
    F: Fn(&FieldValue) -> Result<(), String>,
{
    fn validate(&self, value: &FieldValue) -> Result<(), ValidationError> {
        self(value).map_err(ValidationError::from)
    }
}

/// Field id -> schema
#[derive(Default)]
pub struct ValidatorRegistry {
    schemas: HashMap<String, Box<dyn Schema>>,
}

impl ValidatorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` for `id`, replacing any previous one
    pub fn register(&mut self, id: impl Into<String>, schema: impl Schema + 'static) -> &mut Self {
        self.schemas.insert(id.into(), Box::new(schema));
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, id: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.register(id, schema);
        self
    }

    /// Schema registered for `id`
    pub fn get(&self, id: &str) -> Option<&dyn Schema> {
        self.schemas.get(id).map(|s| s.as_ref())
    }

    /// True when `id` has a schema
    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Number of validated fields
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Ids with a schema, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Validate one field. `None` when no schema is registered for `id`.
    pub fn validate_field(&self, id: &str, value: &FieldValue) -> Option<Result<(), ValidationError>> {
        self.get(id).map(|schema| schema.validate(value))
    }

    /// Run every registered schema against `values` and collect the failures.
    ///
    /// Fields without a schema, and fields that pass, are absent from the
    /// result. Missing values are validated as `Null`.
    pub fn validate_values(&self, values: &Values) -> Errors {
        self.schemas
            .iter()
            .filter_map(|(id, schema)| {
                let value = values.get(id).unwrap_or(&NULL_VALUE);
                match schema.validate(value) {
                    Ok(()) => None,
                    Err(err) => {
                        tracing::debug!(field = %id, error = %err, "validation failed");
                        Some((id.clone(), err.message))
                    }
                }
            })
            .collect()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.schemas.keys().collect();
        ids.sort();
        f.debug_struct("ValidatorRegistry").field("fields", &ids).finish()
    }
}
