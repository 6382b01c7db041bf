//! Object data model and base-property derivation.

mod base;
mod bounds;

pub use base::{Body, BoundingBox, GeoscienceObject, Lineage, SchemaTag};
pub use bounds::{derive, scan, BoundsProvenance};
