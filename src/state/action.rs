//! Actions accepted by the form reducer

use super::form_state::{Errors, FieldValue, FormState, Values};
use std::fmt;

/// New value for a field: either the value itself, or a function of the
/// previous value (like `setState` with an updater).
pub enum ChangeStateAction {
    Set(FieldValue),
    Update(Box<dyn FnOnce(&FieldValue) -> FieldValue>),
}

impl ChangeStateAction {
    /// Wrap an updater closure
    pub fn update<F>(f: F) -> Self
    where
        F: FnOnce(&FieldValue) -> FieldValue + 'static,
    {
        ChangeStateAction::Update(Box::new(f))
    }

    /// Compute the value this action produces when applied to `previous`
    pub fn resolve(self, previous: &FieldValue) -> FieldValue {
        match self {
            ChangeStateAction::Set(value) => value,
            ChangeStateAction::Update(f) => f(previous),
        }
    }
}

impl fmt::Debug for ChangeStateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeStateAction::Set(value) => f.debug_tuple("Set").field(value).finish(),
            ChangeStateAction::Update(_) => f.write_str("Update(<fn>)"),
        }
    }
}

impl From<FieldValue> for ChangeStateAction {
    fn from(value: FieldValue) -> Self {
        ChangeStateAction::Set(value)
    }
}

macro_rules! impl_set_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ChangeStateAction {
                fn from(value: $ty) -> Self {
                    ChangeStateAction::Set(FieldValue::from(value))
                }
            }
        )*
    };
}

impl_set_from!(&str, String, bool, i32, i64, u32, u64, f64);

/// Transition requested from the form reducer
#[derive(Debug)]
pub enum DispatchAction {
    /// Set or update one field's value
    ChangeValue {
        id: String,
        action: ChangeStateAction,
    },
    /// Merge values into the current values
    ChangeValues(Values),
    /// Set one field's error
    ChangeError { id: String, error: String },
    /// Replace all errors
    ChangeErrors(Errors),
    /// Replace the whole state; `None` clears it
    Reset(Option<FormState>),
}

impl DispatchAction {
    /// Short action name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            DispatchAction::ChangeValue { .. } => "CHANGE_VALUE",
            DispatchAction::ChangeValues(_) => "CHANGE_VALUES",
            DispatchAction::ChangeError { .. } => "CHANGE_ERROR",
            DispatchAction::ChangeErrors(_) => "CHANGE_ERRORS",
            DispatchAction::Reset(_) => "RESET",
        }
    }

    /// Field targeted by single-field actions
    pub fn target(&self) -> Option<&str> {
        match self {
            DispatchAction::ChangeValue { id, .. } | DispatchAction::ChangeError { id, .. } => {
                Some(id)
            }
            _ => None,
        }
    }
}
