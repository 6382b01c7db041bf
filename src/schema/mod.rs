//! Schema catalogue and registry.
//!
//! The catalogue is a closed table of 29 object variants. Each entry is an
//! ordered field tree with required/optional markers and the cross-field
//! invariants that make an object of that variant structurally valid.

mod catalog;
mod errors;
mod registry;
mod types;

pub use catalog::catalog;
pub use errors::{RegistryError, RegistryErrorCode, RegistryResult, Severity};
pub use registry::SchemaRegistry;
pub use types::{
    resolve_in, FieldSpec, InvariantRule, ObjectVariant, SchemaDefinition, ValueKind,
};
