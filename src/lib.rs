//! formstore - reducer-driven form state
//!
//! A [`FormStore`] owns the values and error messages of one form. Per-field
//! adapters ([`Field`], [`ReadField`], [`Submit`]) are handed the store
//! explicitly and talk to it through dispatched actions. Observers subscribe
//! by field id and are only notified when one of their fields changes.
//!
//! ```
//! use formstore::{Field, FormStore, Submit, SubmitOutcome, ValidatorRegistry};
//! use serde_json::json;
//!
//! let mut validators = ValidatorRegistry::new();
//! validators.register("email", |value: &serde_json::Value| match value.as_str() {
//!     Some(s) if !s.is_empty() => Ok(()),
//!     _ => Err("must not be empty".to_string()),
//! });
//!
//! let store = FormStore::with_validators(
//!     [("email".to_string(), json!("")), ("age".to_string(), json!(0))].into(),
//!     validators,
//! );
//!
//! let email = Field::new(&store, "email");
//! email.change_value("a@b.com");
//!
//! let mut submit = Submit::new(&store, |values| values.len());
//! assert!(matches!(submit.submit(), SubmitOutcome::Submitted(2)));
//! ```

pub mod bindings;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod validation;

pub use bindings::{
    Field, FieldProps, FieldSelector, ReadField, ReadFieldProps, Submit, SubmitOutcome,
};
pub use config::FormConfig;
pub use error::{ConfigError, ValidationError};
pub use state::{form_reducer, ChangeStateAction, DispatchAction, Errors, FieldValue, FormState, Values};
pub use store::{FormStore, Subscription, Watch};
pub use validation::{Rule, RuleSet, Schema, ValidatorRegistry};
