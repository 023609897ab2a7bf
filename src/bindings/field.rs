//! Read/write adapter for a single field

use crate::state::{ChangeStateAction, DispatchAction, FieldValue, FormState};
use crate::store::{FormStore, Subscription, Watch};

/// Binds one field id of a [`FormStore`] to caller UI
#[derive(Debug, Clone)]
pub struct Field {
    store: FormStore,
    id: String,
}

/// What a field renderer gets: the field's current value and error, plus
/// the ability to change them.
#[derive(Debug, Clone)]
pub struct FieldProps {
    pub value: FieldValue,
    pub error: Option<String>,
    field: Field,
}

impl FieldProps {
    fn from_state(field: &Field, state: &FormState) -> Self {
        Self {
            value: state.value(&field.id).clone(),
            error: state.error(&field.id).map(str::to_owned),
            field: field.clone(),
        }
    }

    /// Id of the field these props belong to
    pub fn id(&self) -> &str {
        &self.field.id
    }

    /// Error message, treating an absent error as empty
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }

    /// Same as [`Field::change_value`]
    pub fn change_value(&self, action: impl Into<ChangeStateAction>) {
        self.field.change_value(action);
    }

    /// Same as [`Field::change_error`]
    pub fn change_error(&self, error: impl Into<String>) {
        self.field.change_error(error);
    }
}

impl Field {
    /// Bind field `id` of `store`
    pub fn new(store: &FormStore, id: impl Into<String>) -> Self {
        Self {
            store: store.clone(),
            id: id.into(),
        }
    }

    /// The bound field id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current value, `Null` if the field is unknown
    pub fn value(&self) -> FieldValue {
        self.store.with_state(|s| s.value(&self.id).clone())
    }

    /// Current error, `None` if the field is unknown
    pub fn error(&self) -> Option<String> {
        self.store.with_state(|s| s.error(&self.id).map(str::to_owned))
    }

    /// Change the value, then validate it if a schema is registered for
    /// this field.
    ///
    /// An updater is resolved against the current value before dispatch,
    /// so the schema sees exactly the value being committed.
    pub fn change_value(&self, action: impl Into<ChangeStateAction>) {
        let current = self.value();
        let next = action.into().resolve(&current);

        self.store.dispatch(DispatchAction::ChangeValue {
            id: self.id.clone(),
            action: ChangeStateAction::Set(next.clone()),
        });

        let validators = self.store.validators();
        let Some(result) = validators.validate_field(&self.id, &next) else {
            return;
        };
        let error = match result {
            Ok(()) => String::new(),
            Err(err) => {
                tracing::debug!(field = %self.id, error = %err, "field rejected value");
                err.message
            }
        };
        self.store.change_error(self.id.clone(), error);
    }

    /// Set the error directly; no validation is involved
    pub fn change_error(&self, error: impl Into<String>) {
        self.store.change_error(self.id.clone(), error);
    }

    /// Current props for a renderer
    pub fn props(&self) -> FieldProps {
        self.store.with_state(|s| FieldProps::from_state(self, s))
    }

    /// Render once with the current props
    pub fn render<R>(&self, render: impl FnOnce(&FieldProps) -> R) -> R {
        render(&self.props())
    }

    /// Render now, and again whenever this field's value or error changes
    pub fn watch<F>(&self, mut render: F) -> Subscription
    where
        F: FnMut(&FieldProps) + 'static,
    {
        render(&self.props());
        let field = self.clone();
        self.store
            .subscribe(Watch::Field(self.id.clone()), move |state| {
                render(&FieldProps::from_state(&field, state));
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::state::Values;
    use crate::validation::{MockSchema, ValidatorRegistry};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn signup_values() -> Values {
        Values::from([
            ("email".to_string(), json!("")),
            ("age".to_string(), json!(0)),
            ("subscribed".to_string(), json!(false)),
        ])
    }

    fn non_empty(value: &FieldValue) -> Result<(), String> {
        match value.as_str() {
            Some(s) if !s.is_empty() => Ok(()),
            _ => Err("must not be empty".to_string()),
        }
    }

    fn validated_store() -> FormStore {
        FormStore::with_validators(
            signup_values(),
            ValidatorRegistry::new().with("email", non_empty),
        )
    }

    mod reading {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reads_value_and_error() {
            let store = FormStore::new(signup_values());
            let field = Field::new(&store, "email");
            assert_eq!(field.id(), "email");
            assert_eq!(field.value(), json!(""));
            assert_eq!(field.error(), Some(String::new()));
        }

        #[test]
        fn test_unknown_field_reads_null() {
            let store = FormStore::new(signup_values());
            let field = Field::new(&store, "nickname");
            assert_eq!(field.value(), FieldValue::Null);
            assert_eq!(field.error(), None);
            assert_eq!(field.props().error_message(), "");
        }
    }

    mod changing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_change_value_without_validator_leaves_error() {
            let store = FormStore::new(signup_values());
            let field = Field::new(&store, "email");
            field.change_error("manual");
            field.change_value("x");
            assert_eq!(store.get_value("email"), Some(json!("x")));
            assert_eq!(store.get_error("email"), Some("manual".to_string()));
        }

        #[test]
        fn test_toggle_with_updater() {
            let store = FormStore::new(signup_values());
            let field = Field::new(&store, "subscribed");
            field.change_value(ChangeStateAction::update(|prev| {
                json!(!prev.as_bool().unwrap_or(false))
            }));
            assert_eq!(field.value(), json!(true));
        }

        #[test]
        fn test_validation_sets_and_clears_error() {
            let store = validated_store();
            let field = Field::new(&store, "email");

            field.change_value("");
            assert_eq!(field.error(), Some("must not be empty".to_string()));

            field.change_value("a@b.com");
            assert_eq!(field.error(), Some(String::new()));
        }

        #[test]
        fn test_manual_error_bypasses_validator() {
            let store = validated_store();
            let field = Field::new(&store, "email");
            field.change_value("a@b.com");
            field.change_error("already registered");
            assert_eq!(field.error(), Some("already registered".to_string()));
        }

        #[test]
        fn test_validator_sees_updater_result() {
            let mut schema = MockSchema::new();
            schema
                .expect_validate()
                .with(eq(json!(41)))
                .times(1)
                .returning(|_| Err(ValidationError::new("must be at least 42")));
            let store =
                FormStore::with_validators(signup_values(), ValidatorRegistry::new().with("age", schema));
            store.change_value("age", 40);

            let field = Field::new(&store, "age");
            field.change_value(ChangeStateAction::update(|prev| {
                json!(prev.as_i64().unwrap_or(0) + 1)
            }));

            assert_eq!(field.value(), json!(41));
            assert_eq!(field.error(), Some("must be at least 42".to_string()));
        }

        #[test]
        fn test_props_change_through_bound_field() {
            let store = FormStore::new(signup_values());
            let props = Field::new(&store, "age").props();
            props.change_value(9);
            props.change_error("odd");
            assert_eq!(props.id(), "age");
            assert_eq!(store.get_value("age"), Some(json!(9)));
            assert_eq!(store.get_error("age"), Some("odd".to_string()));
        }
    }

    mod rendering {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_render_returns_renderer_output() {
            let store = FormStore::new(signup_values());
            let field = Field::new(&store, "age");
            let label = field.render(|props| format!("age={}", props.value));
            assert_eq!(label, "age=0");
        }

        #[test]
        fn test_watch_renders_only_on_own_changes() {
            let store = validated_store();
            let field = Field::new(&store, "email");
            let renders = Rc::new(RefCell::new(Vec::new()));
            let log = Rc::clone(&renders);
            let _sub = field.watch(move |props| {
                log.borrow_mut()
                    .push((props.value.clone(), props.error_message().to_string()));
            });

            store.change_value("age", 30);
            field.change_value("");

            assert_eq!(
                *renders.borrow(),
                vec![
                    (json!(""), String::new()),
                    (json!(""), "must not be empty".to_string()),
                ]
            );
        }

        #[test]
        fn test_watch_renderer_can_change_value() {
            let store = FormStore::new(signup_values());
            let field = Field::new(&store, "email");
            let _sub = field.watch(|props| {
                if let Some(s) = props.value.as_str() {
                    if s != s.to_lowercase() {
                        props.change_value(s.to_lowercase());
                    }
                }
            });
            field.change_value("A@B.COM");
            assert_eq!(field.value(), json!("a@b.com"));
        }
    }
}
