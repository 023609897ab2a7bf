//! The form reducer

use super::action::DispatchAction;
use super::form_state::{FormState, NULL_VALUE};

/// Apply one action to the form state.
///
/// `ChangeValues` merges into the existing values while `ChangeErrors`
/// replaces the error map wholesale. Ids are never checked against the
/// initial fields, so actions on unknown ids add them.
pub fn form_reducer(mut state: FormState, action: DispatchAction) -> FormState {
    match action {
        DispatchAction::ChangeValue { id, action } => {
            let next = action.resolve(state.values.get(&id).unwrap_or(&NULL_VALUE));
            state.values.insert(id, next);
            state
        }
        DispatchAction::ChangeValues(values) => {
            state.values.extend(values);
            state
        }
        DispatchAction::ChangeError { id, error } => {
            state.errors.insert(id, error);
            state
        }
        DispatchAction::ChangeErrors(errors) => {
            state.errors = errors;
            state
        }
        DispatchAction::Reset(snapshot) => snapshot.unwrap_or_default(),
    }
}
