//! In-memory schema registry populated once at start-up.
//!
//! The registry is the only shared state in the engine. It is written by
//! exactly one caller during bootstrap and treated as immutable for the
//! rest of the process: lookups are plain reads and need no locking, so
//! concurrent builds may share one registry by reference.

use std::collections::BTreeMap;

use crate::observability::{log_event_with_fields, Event};

use super::catalog::catalog;
use super::errors::{RegistryError, RegistryResult};
use super::types::{ObjectVariant, SchemaDefinition};

/// Catalogue of schema definitions keyed by variant.
pub struct SchemaRegistry {
    definitions: BTreeMap<ObjectVariant, SchemaDefinition>,
}

impl SchemaRegistry {
    /// Creates an empty registry. Production code goes through
    /// [`SchemaRegistry::bootstrap`]; this exists for tests that need a
    /// partial table.
    pub fn empty() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    /// Builds the registry from the embedded catalogue.
    ///
    /// A duplicate tag in the table is a FATAL configuration error: it
    /// cannot be caused by any request, so the process must not start.
    pub fn bootstrap() -> RegistryResult<Self> {
        let mut registry = Self::empty();
        for definition in catalog() {
            registry.register(definition)?;
        }
        log_event_with_fields(
            Event::CatalogueLoaded,
            &[("variants", &registry.len().to_string())],
        );
        Ok(registry)
    }

    /// Registers a single definition. Idempotent over distinct variants;
    /// registering the same variant twice is fatal.
    pub fn register(&mut self, definition: SchemaDefinition) -> RegistryResult<()> {
        let variant = definition.variant;
        if self.definitions.contains_key(&variant) {
            return Err(RegistryError::duplicate_variant(variant.tag()));
        }
        self.definitions.insert(variant, definition);
        Ok(())
    }

    /// Looks up the definition governing a variant.
    pub fn lookup(&self, variant: ObjectVariant) -> RegistryResult<&SchemaDefinition> {
        self.definitions
            .get(&variant)
            .ok_or_else(|| RegistryError::unknown_variant(variant.tag()))
    }

    /// Looks up a definition by kebab-case tag.
    pub fn lookup_tag(&self, tag: &str) -> RegistryResult<&SchemaDefinition> {
        let variant =
            ObjectVariant::from_tag(tag).ok_or_else(|| RegistryError::unknown_variant(tag))?;
        self.lookup(variant)
    }

    /// Registered variants, in stable order.
    pub fn variants(&self) -> impl Iterator<Item = ObjectVariant> + '_ {
        self.definitions.keys().copied()
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True when nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
