//! Read-only adapter over one or many fields

use crate::state::{Errors, FieldValue, FormState, Values};
use crate::store::{FormStore, Subscription, Watch};

/// The field id(s) a [`ReadField`] projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelector {
    One(String),
    Many(Vec<String>),
}

impl FieldSelector {
    fn watch(&self) -> Watch {
        match self {
            FieldSelector::One(id) => Watch::Field(id.clone()),
            FieldSelector::Many(ids) => Watch::Fields(ids.clone()),
        }
    }
}

impl From<&str> for FieldSelector {
    fn from(id: &str) -> Self {
        FieldSelector::One(id.to_string())
    }
}

impl From<String> for FieldSelector {
    fn from(id: String) -> Self {
        FieldSelector::One(id)
    }
}

impl From<Vec<String>> for FieldSelector {
    fn from(ids: Vec<String>) -> Self {
        FieldSelector::Many(ids)
    }
}

impl From<Vec<&str>> for FieldSelector {
    fn from(ids: Vec<&str>) -> Self {
        FieldSelector::Many(ids.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldSelector {
    fn from(ids: [&str; N]) -> Self {
        FieldSelector::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

/// Projection handed to a [`ReadField`] renderer
#[derive(Debug, Clone, PartialEq)]
pub enum ReadFieldProps {
    /// A single field's raw value and error
    One {
        value: FieldValue,
        error: Option<String>,
    },
    /// Requested ids mapped to their values, and separately to their errors.
    /// Unknown ids read as `Null` / `""`.
    Many { values: Values, errors: Errors },
}

impl ReadFieldProps {
    fn project(selector: &FieldSelector, state: &FormState) -> Self {
        match selector {
            FieldSelector::One(id) => ReadFieldProps::One {
                value: state.value(id).clone(),
                error: state.error(id).map(str::to_owned),
            },
            FieldSelector::Many(ids) => ReadFieldProps::Many {
                values: ids
                    .iter()
                    .map(|id| (id.clone(), state.value(id).clone()))
                    .collect(),
                errors: ids
                    .iter()
                    .map(|id| (id.clone(), state.error(id).unwrap_or("").to_owned()))
                    .collect(),
            },
        }
    }

    /// Value of `id`. A `One` projection answers for its single field
    /// whatever id is passed.
    pub fn value(&self, id: &str) -> Option<&FieldValue> {
        match self {
            ReadFieldProps::One { value, .. } => Some(value),
            ReadFieldProps::Many { values, .. } => values.get(id),
        }
    }

    /// Error of `id`, if set
    pub fn error(&self, id: &str) -> Option<&str> {
        match self {
            ReadFieldProps::One { error, .. } => error.as_deref(),
            ReadFieldProps::Many { errors, .. } => errors.get(id).map(String::as_str),
        }
    }
}

/// Reads field values and errors without being able to change them
#[derive(Debug, Clone)]
pub struct ReadField {
    store: FormStore,
    selector: FieldSelector,
}

impl ReadField {
    /// Read the field(s) named by `selector` from `store`
    pub fn new(store: &FormStore, selector: impl Into<FieldSelector>) -> Self {
        Self {
            store: store.clone(),
            selector: selector.into(),
        }
    }

    pub fn selector(&self) -> &FieldSelector {
        &self.selector
    }

    /// Project the current state
    pub fn read(&self) -> ReadFieldProps {
        self.store
            .with_state(|s| ReadFieldProps::project(&self.selector, s))
    }

    /// Render once with the current projection
    pub fn render<R>(&self, render: impl FnOnce(&ReadFieldProps) -> R) -> R {
        render(&self.read())
    }

    /// Render now, and again whenever one of the selected fields changes
    pub fn watch<F>(&self, mut render: F) -> Subscription
    where
        F: FnMut(&ReadFieldProps) + 'static,
    {
        render(&self.read());
        let selector = self.selector.clone();
        self.store.subscribe(self.selector.watch(), move |state| {
            render(&ReadFieldProps::project(&selector, state));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn store() -> FormStore {
        FormStore::new(Values::from([
            ("email".to_string(), json!("a@b.com")),
            ("age".to_string(), json!(0)),
            ("city".to_string(), json!("Oslo")),
        ]))
    }

    mod selectors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_conversions() {
            assert_eq!(FieldSelector::from("a"), FieldSelector::One("a".into()));
            assert_eq!(
                FieldSelector::from(["a", "b"]),
                FieldSelector::Many(vec!["a".into(), "b".into()])
            );
            assert_eq!(
                FieldSelector::from(vec!["a"]),
                FieldSelector::Many(vec!["a".into()])
            );
        }
    }

    mod reading {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_single_id_reads_raw_value_and_error() {
            let store = store();
            store.change_error("email", "taken");
            let props = ReadField::new(&store, "email").read();
            assert_eq!(
                props,
                ReadFieldProps::One {
                    value: json!("a@b.com"),
                    error: Some("taken".to_string()),
                }
            );
        }

        #[test]
        fn test_many_ids_read_two_independent_maps() {
            let store = store();
            let props = ReadField::new(&store, ["email", "age"]).read();
            assert_eq!(
                props,
                ReadFieldProps::Many {
                    values: Values::from([
                        ("email".to_string(), json!("a@b.com")),
                        ("age".to_string(), json!(0)),
                    ]),
                    errors: Errors::from([
                        ("email".to_string(), String::new()),
                        ("age".to_string(), String::new()),
                    ]),
                }
            );
        }

        #[test]
        fn test_id_order_does_not_matter() {
            let store = store();
            assert_eq!(
                ReadField::new(&store, ["email", "age"]).read(),
                ReadField::new(&store, ["age", "email"]).read()
            );
        }

        #[test]
        fn test_unknown_ids_read_null_and_empty() {
            let store = store();
            let props = ReadField::new(&store, ["nickname"]).read();
            assert_eq!(props.value("nickname"), Some(&FieldValue::Null));
            assert_eq!(props.error("nickname"), Some(""));
            assert_eq!(props.value("email"), None);
        }

        #[test]
        fn test_render_passes_projection() {
            let store = store();
            let line = ReadField::new(&store, ["email", "city"]).render(|props| {
                format!(
                    "{} / {}",
                    props.value("email").and_then(|v| v.as_str()).unwrap_or(""),
                    props.value("city").and_then(|v| v.as_str()).unwrap_or("")
                )
            });
            assert_eq!(line, "a@b.com / Oslo");
        }
    }

    mod watching {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_watch_ignores_unselected_fields() {
            let store = store();
            let renders = Rc::new(Cell::new(0));
            let count = Rc::clone(&renders);
            let _sub = ReadField::new(&store, ["email", "age"])
                .watch(move |_| count.set(count.get() + 1));

            store.change_value("city", "Bergen");
            store.change_value("age", 12);
            store.change_error("email", "taken");

            assert_eq!(renders.get(), 3);
        }

        #[test]
        fn test_read_field_never_dispatches() {
            let store = store();
            let before = store.state();
            let reader = ReadField::new(&store, "email");
            let _ = reader.read();
            let _sub = reader.watch(|_| {});
            assert_eq!(store.state(), before);
        }
    }
}
