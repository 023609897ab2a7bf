//! Adapters between a form store and caller UI
//!
//! - `field`: read and change one field, with per-change validation
//! - `read_field`: read-only projection of one or many fields
//! - `submit`: validate the whole form and call a submit handler

mod field;
mod read_field;
mod submit;

pub use field::{Field, FieldProps};
pub use read_field::{FieldSelector, ReadField, ReadFieldProps};
pub use submit::{Submit, SubmitOutcome};
