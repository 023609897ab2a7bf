//! Form state, actions and the reducer

mod action;
mod form_state;
mod reducer;

pub use action::{ChangeStateAction, DispatchAction};
pub use form_state::{Errors, FieldValue, FormState, Values};
pub(crate) use form_state::NULL_VALUE;
pub use reducer::form_reducer;
