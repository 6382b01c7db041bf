//! Object construction from columnar input.
//!
//! The builder turns a row stream plus an explicit column mapping into a
//! validated object, or a complete list of violations. See `build` for
//! the assembly algorithm.

mod build;
mod errors;
mod mapping;
mod rows;

pub use build::{BuildRequest, Built, ObjectBuilder};
pub use errors::{BuildError, BuildResult};
pub use mapping::{Binding, FieldMapping, MapEntry};
pub use rows::{MemoryRows, Record, RowIter, RowSource, SourceError};
