//! Submit adapter: validate everything, then hand the values to a handler

use crate::state::{Errors, Values};
use crate::store::FormStore;
use std::fmt;

/// Result of [`Submit::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    /// Validation passed and the handler returned `R`
    Submitted(R),
    /// At least one schema failed; these errors were published to the store
    Rejected(Errors),
}

impl<R> SubmitOutcome<R> {
    /// True when the handler ran
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }

    /// The handler's result, if it ran
    pub fn submitted(self) -> Option<R> {
        match self {
            SubmitOutcome::Submitted(result) => Some(result),
            SubmitOutcome::Rejected(_) => None,
        }
    }
}

/// Wraps a submit handler for one form
pub struct Submit<F> {
    store: FormStore,
    on_submit: F,
}

impl<F> Submit<F> {
    /// Submit `store`'s values to `on_submit`
    pub fn new<R>(store: &FormStore, on_submit: F) -> Self
    where
        F: FnMut(&Values) -> R,
    {
        Self {
            store: store.clone(),
            on_submit,
        }
    }

    /// Validate every registered field against its current value.
    ///
    /// On any failure the collected errors replace the store's error map and
    /// the handler is not called. Otherwise the handler receives the current
    /// values. Errors are left untouched when everything passes, including
    /// manual errors on fields without a schema.
    pub fn submit<R>(&mut self) -> SubmitOutcome<R>
    where
        F: FnMut(&Values) -> R,
    {
        let values = self.store.get_values();
        let validators = self.store.validators();

        if !validators.is_empty() {
            let failures = validators.validate_values(&values);
            if !failures.is_empty() {
                tracing::info!(failed = failures.len(), "submit rejected by validation");
                self.store.change_errors(failures.clone());
                return SubmitOutcome::Rejected(failures);
            }
        }

        tracing::info!(fields = values.len(), "form submitted");
        SubmitOutcome::Submitted((self.on_submit)(&values))
    }
}

impl<F> fmt::Debug for Submit<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submit").field("store", &self.store).finish()
    }
}
