//! The form store: owner of one form's state
//!
//! `FormStore` is a cheap handle (`Clone` shares the same form). It is the
//! only place state changes: every mutation goes through
//! [`FormStore::dispatch`], which runs [`form_reducer`] and then notifies
//! subscribers whose fields changed.

use crate::state::{
    form_reducer, ChangeStateAction, DispatchAction, Errors, FieldValue, FormState, Values,
};
use crate::validation::ValidatorRegistry;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

/// Which fields a subscriber cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Watch {
    Field(String),
    Fields(Vec<String>),
    All,
}

impl Watch {
    fn matches(&self, changed: &HashSet<String>) -> bool {
        match self {
            Watch::Field(id) => changed.contains(id),
            Watch::Fields(ids) => ids.iter().any(|id| changed.contains(id)),
            Watch::All => !changed.is_empty(),
        }
    }
}

type Callback = Rc<RefCell<dyn FnMut(&FormState)>>;

struct Subscriber {
    id: u64,
    watch: Watch,
    // Cleared by `Subscription::drop`, even when the list can't be borrowed
    alive: Rc<Cell<bool>>,
    callback: Callback,
}

struct StoreInner {
    state: FormState,
    initial: FormState,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
}

/// Container for one form's values and errors
#[derive(Clone)]
pub struct FormStore {
    inner: Rc<RefCell<StoreInner>>,
    validators: Rc<ValidatorRegistry>,
}

impl FormStore {
    /// Create a store with no validators.
    ///
    /// `initial_values` should list every field the form uses; each gets an
    /// empty error. This snapshot is what [`reset`](Self::reset) returns to.
    pub fn new(initial_values: Values) -> Self {
        Self::with_validators(initial_values, ValidatorRegistry::new())
    }

    /// Create a store whose fields are validated by `validators`
    pub fn with_validators(initial_values: Values, validators: ValidatorRegistry) -> Self {
        let initial = FormState::from_initial_values(initial_values);
        tracing::debug!(
            fields = initial.values.len(),
            validators = validators.len(),
            "form store created"
        );
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state: initial.clone(),
                initial,
                subscribers: Vec::new(),
                next_subscriber_id: 0,
            })),
            validators: Rc::new(validators),
        }
    }

    /// Apply `action` and notify the subscribers of every field it changed.
    ///
    /// No caller code runs while the state is borrowed: an updater is
    /// resolved first, and callbacks run after the new state is committed.
    /// Each callback reads the state as it is when its turn comes, so a
    /// dispatch made by an earlier callback is never followed by an older
    /// snapshot.
    pub fn dispatch(&self, action: DispatchAction) {
        tracing::debug!(
            action = action.name(),
            field = action.target().unwrap_or("*"),
            "dispatch"
        );

        let action = match action {
            DispatchAction::ChangeValue {
                id,
                action: update @ ChangeStateAction::Update(_),
            } => {
                let current = self.with_state(|s| s.value(&id).clone());
                DispatchAction::ChangeValue {
                    action: ChangeStateAction::Set(update.resolve(&current)),
                    id,
                }
            }
            other => other,
        };

        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            let next = form_reducer(inner.state.clone(), action);
            let changed = inner.state.changed_ids(&next);
            inner.state = next;
            inner.subscribers.retain(|s| s.alive.get());

            if changed.is_empty() {
                return;
            }

            let callbacks: Vec<(Rc<Cell<bool>>, Callback)> = inner
                .subscribers
                .iter()
                .filter(|s| s.watch.matches(&changed))
                .map(|s| (Rc::clone(&s.alive), Rc::clone(&s.callback)))
                .collect();
            tracing::trace!(
                changed = changed.len(),
                notified = callbacks.len(),
                "state changed"
            );
            callbacks
        };

        for (alive, callback) in callbacks {
            // Unsubscribed by an earlier callback
            if !alive.get() {
                continue;
            }
            // A subscriber dispatching from its own callback is already
            // running; it sees the nested change through the store instead.
            if let Ok(mut callback) = callback.try_borrow_mut() {
                let snapshot = self.state();
                (&mut *callback)(&snapshot);
            }
        }
    }

    /// Call `callback` after every dispatch that changes a watched field.
    ///
    /// The callback is not invoked on subscription. Dropping the returned
    /// [`Subscription`] unregisters it.
    pub fn subscribe<F>(&self, watch: Watch, callback: F) -> Subscription
    where
        F: FnMut(&FormState) + 'static,
    {
        let alive = Rc::new(Cell::new(true));
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            watch,
            alive: Rc::clone(&alive),
            callback: Rc::new(RefCell::new(callback)),
        });
        Subscription {
            id,
            alive,
            store: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.alive.get())
            .count()
    }

    /// Run `f` against the current state without cloning it.
    ///
    /// The state stays borrowed while `f` runs, so `f` must not dispatch.
    /// Read through [`state`](Self::state) when it needs to.
    pub fn with_state<R>(&self, f: impl FnOnce(&FormState) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FormState {
        self.with_state(FormState::clone)
    }

    /// The snapshot taken at construction
    pub fn initial_state(&self) -> FormState {
        self.inner.borrow().initial.clone()
    }

    /// The registry this store was built with
    pub fn validators(&self) -> Rc<ValidatorRegistry> {
        Rc::clone(&self.validators)
    }

    /// True when the values differ from the construction snapshot
    pub fn is_dirty(&self) -> bool {
        let inner = self.inner.borrow();
        inner.state.values != inner.initial.values
    }

    /// True when any field carries a non-empty error
    pub fn has_errors(&self) -> bool {
        self.with_state(FormState::has_errors)
    }

    // Imperative handle

    /// Current value of `id`, `None` if the field is unknown
    pub fn get_value(&self, id: &str) -> Option<FieldValue> {
        self.with_state(|s| s.values.get(id).cloned())
    }

    /// Every current value
    pub fn get_values(&self) -> Values {
        self.with_state(|s| s.values.clone())
    }

    /// Current error of `id`; an empty string means no error
    pub fn get_error(&self, id: &str) -> Option<String> {
        self.with_state(|s| s.errors.get(id).cloned())
    }

    /// Every current error
    pub fn get_errors(&self) -> Errors {
        self.with_state(|s| s.errors.clone())
    }

    /// Set a field to a value, or to the result of an updater applied to
    /// its current value
    pub fn change_value(&self, id: impl Into<String>, action: impl Into<ChangeStateAction>) {
        self.dispatch(DispatchAction::ChangeValue {
            id: id.into(),
            action: action.into(),
        });
    }

    /// Merge `values` into the current values
    pub fn change_values(&self, values: Values) {
        self.dispatch(DispatchAction::ChangeValues(values));
    }

    /// Set the error of one field, without validation
    pub fn change_error(&self, id: impl Into<String>, error: impl Into<String>) {
        self.dispatch(DispatchAction::ChangeError {
            id: id.into(),
            error: error.into(),
        });
    }

    /// Replace every error with `errors`
    pub fn change_errors(&self, errors: Errors) {
        self.dispatch(DispatchAction::ChangeErrors(errors));
    }

    /// Restore the construction snapshot
    pub fn reset(&self) {
        let initial = self.initial_state();
        self.dispatch(DispatchAction::Reset(Some(initial)));
    }

    /// Drop all values and errors
    pub fn clear(&self) {
        self.dispatch(DispatchAction::Reset(None));
    }
}

impl fmt::Debug for FormStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FormStore")
            .field("state", &inner.state)
            .field("subscribers", &inner.subscribers.len())
            .field("validators", &self.validators)
            .finish()
    }
}

/// Registration returned by [`FormStore::subscribe`]; unsubscribes on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    alive: Rc<Cell<bool>>,
    store: Weak<RefCell<StoreInner>>,
}

impl Subscription {
    /// Keep the callback registered for as long as the store lives
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.alive.set(false);
        if let Some(inner) = self.store.upgrade() {
            // Left for the next dispatch to prune while the state is borrowed
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.subscribers.retain(|s| s.id != self.id);
            }
        }
    }
}
