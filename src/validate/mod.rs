//! Structural validation.
//!
//! `validate` walks a body against its schema definition and reports
//! every violation; an empty list is the only definition of "valid".

mod violation;
mod walker;

pub use violation::{Violation, ViolationKind};
pub use walker::{validate, Validator};
