//! geoforge - a strict, deterministic schema engine for geoscience objects
//!
//! Turns loosely-typed columnar input into schema-conformant geoscience
//! objects, or a precise list of violations. The catalogue of 29 object
//! variants is embedded and loaded once at start-up; construction is
//! synchronous, stateless per call and all-or-nothing.

pub mod adapter;
pub mod builder;
pub mod object;
pub mod observability;
pub mod primitive;
pub mod schema;
pub mod validate;
