//! Coordinate reference system resolution.
//!
//! CRS lookup is an external concern (an EPSG service in production); the
//! engine only needs the resolver contract and a descriptor type. A
//! static table implementation ships for tests and offline use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinate reference system descriptor attached to every object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    /// Authority code, e.g. "EPSG:4326"
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Well-known text, when the resolver supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
}

impl Crs {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            wkt: None,
        }
    }
}

/// The requested CRS identifier is not known to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown coordinate reference system '{0}'")]
pub struct UnknownCrs(pub String);

/// Resolver contract supplied by the caller.
pub trait CrsResolver {
    fn resolve(&self, code: &str) -> Result<Crs, UnknownCrs>;
}

/// Static in-memory resolver seeded with a handful of common codes.
pub struct StaticCrsResolver {
    entries: BTreeMap<String, Crs>,
}

impl StaticCrsResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Creates a resolver seeded with common geographic and projected
    /// systems.
    pub fn with_common_codes() -> Self {
        let mut resolver = Self::new();
        for (code, name) in [
            ("EPSG:4326", "WGS 84"),
            ("EPSG:4978", "WGS 84 geocentric"),
            ("EPSG:2193", "NZGD2000 / New Zealand Transverse Mercator 2000"),
            ("EPSG:28350", "GDA94 / MGA zone 50"),
            ("EPSG:32750", "WGS 84 / UTM zone 50S"),
        ] {
            resolver.insert(Crs::new(code, name));
        }
        resolver
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, crs: Crs) {
        self.entries.insert(crs.code.clone(), crs);
    }
}

impl Default for StaticCrsResolver {
    fn default() -> Self {
        Self::with_common_codes()
    }
}

impl CrsResolver for StaticCrsResolver {
    fn resolve(&self, code: &str) -> Result<Crs, UnknownCrs> {
        self.entries
            .get(code)
            .cloned()
            .ok_or_else(|| UnknownCrs(code.to_string()))
    }
}
