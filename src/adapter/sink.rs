//! Object sink contract.
//!
//! A sink persists or transmits a validated object (remote object storage
//! in production). The engine hands over the object exactly once and
//! never retries a refusal: retry policy belongs to the sink or the
//! caller, not here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::object::GeoscienceObject;
use crate::observability::{log_event_with_fields, Event};

use thiserror::Error;

/// Metadata acknowledged by a sink for an accepted object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectMetadata {
    /// Object identifier
    pub id: Uuid,
    /// Object name
    pub name: String,
    /// Sink-assigned path
    pub path: String,
    /// Schema tag path, e.g. "objects/pointset/1.2.0"
    pub schema: String,
    /// Acceptance timestamp
    pub created_at: DateTime<Utc>,
}

/// Sink failures. Never produced by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("sink rejected '{path}': {reason}")]
    Rejected { path: String, reason: String },

    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Sink contract supplied by the caller.
pub trait ObjectSink {
    /// Accepts a fully validated object at the given path.
    fn accept(
        &mut self,
        path: &str,
        object: &GeoscienceObject,
    ) -> Result<ObjectMetadata, SinkError>;
}

/// In-memory sink for tests.
pub struct MemorySink {
    accepted: Vec<(String, GeoscienceObject)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            accepted: Vec::new(),
        }
    }

    /// Objects accepted so far, in arrival order.
    pub fn accepted(&self) -> &[(String, GeoscienceObject)] {
        &self.accepted
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectSink for MemorySink {
    fn accept(
        &mut self,
        path: &str,
        object: &GeoscienceObject,
    ) -> Result<ObjectMetadata, SinkError> {
        let metadata = ObjectMetadata {
            id: object.uuid,
            name: object.name.clone(),
            path: path.to_string(),
            schema: object.schema.to_string(),
            created_at: Utc::now(),
        };
        self.accepted.push((path.to_string(), object.clone()));
        log_event_with_fields(
            Event::SinkHandoff,
            &[("path", path), ("schema", object.schema.tag())],
        );
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_display() {
        let err = SinkError::Rejected {
            path: "drilling/site-a".into(),
            reason: "quota exceeded".into(),
        };
        let display = format!("{}", err);
        assert!(display.contains("drilling/site-a"));
        assert!(display.contains("quota exceeded"));
    }
}
