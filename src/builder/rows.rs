//! Row source contract.
//!
//! Input rows arrive as a finite, restartable, ordered sequence of
//! records, each a mapping from column name to raw value. The producer
//! (a CSV reader, a paginated remote table) lives outside the engine;
//! the builder only pulls.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// One input row: column name to raw value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    columns: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from (column, value) pairs.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            columns: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.columns.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }
}

/// A failure in the external row producer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row source failed: {0}")]
pub struct SourceError(pub String);

/// One streaming pass over a source's rows.
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Record, SourceError>> + 'a>;

/// Row source contract supplied by the caller.
///
/// `rows` may be called more than once; each call restarts the sequence
/// from the beginning. The builder performs exactly one pass per build.
pub trait RowSource {
    fn rows(&self) -> Result<RowIter<'_>, SourceError>;
}

/// In-memory source for tests and small imports.
#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    records: Vec<Record>,
}

impl MemoryRows {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl RowSource for MemoryRows {
    fn rows(&self) -> Result<RowIter<'_>, SourceError> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_rows_restart() {
        let source = MemoryRows::new(vec![
            Record::from_pairs([("x", json!(1.0))]),
            Record::from_pairs([("x", json!(2.0))]),
        ]);

        for _ in 0..2 {
            let rows: Vec<_> = source.rows().unwrap().collect::<Result<_, _>>().unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].get("x"), Some(&json!(1.0)));
        }
    }
}
