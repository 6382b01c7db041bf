//! Column-to-field mapping.
//!
//! A mapping declares exactly which input columns populate which schema
//! paths. Nothing is ever inferred from column names: silent
//! misassignment on renamed CSV headers is worse than an explicit error.

use serde_json::Value;

/// How one schema path is populated.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A literal value (grid origin, sizes, survey constants)
    Constant(Value),
    /// One column, streamed into an array field one element per row, or
    /// taken from the first row for a single-valued field
    Column(String),
    /// Several columns assembled into one tuple per row (coordinate
    /// triples, index tuples); arity must match the field kind
    Columns(Vec<String>),
    /// Several columns streamed into a named-attribute list, one
    /// `{name, values}` entry per column
    AttributeColumns(Vec<String>),
    /// The group's key value (only valid inside `GroupBy` entries)
    GroupKey,
    /// Rows partitioned by a column, in first-seen order, assembling a
    /// record list; inner entries bind within each group
    GroupBy {
        column: String,
        entries: Vec<MapEntry>,
    },
}

/// One mapping entry: a dotted schema path and its binding.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub path: String,
    pub binding: Binding,
}

impl MapEntry {
    pub fn new(path: impl Into<String>, binding: Binding) -> Self {
        Self {
            path: path.into(),
            binding,
        }
    }
}

/// The complete, explicit mapping for one build.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMapping {
    pub entries: Vec<MapEntry>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, entry: MapEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Binds a literal value to a path.
    pub fn constant(self, path: impl Into<String>, value: Value) -> Self {
        self.push(MapEntry::new(path, Binding::Constant(value)))
    }

    /// Binds one column to a path.
    pub fn column(self, path: impl Into<String>, column: impl Into<String>) -> Self {
        self.push(MapEntry::new(path, Binding::Column(column.into())))
    }

    /// Binds a column tuple to a path.
    pub fn columns<C: Into<String>>(
        self,
        path: impl Into<String>,
        columns: impl IntoIterator<Item = C>,
    ) -> Self {
        self.push(MapEntry::new(
            path,
            Binding::Columns(columns.into_iter().map(Into::into).collect()),
        ))
    }

    /// Binds columns to a named-attribute list.
    pub fn attribute_columns<C: Into<String>>(
        self,
        path: impl Into<String>,
        columns: impl IntoIterator<Item = C>,
    ) -> Self {
        self.push(MapEntry::new(
            path,
            Binding::AttributeColumns(columns.into_iter().map(Into::into).collect()),
        ))
    }

    /// Binds the group key to a path inside a `group_by` entry set.
    pub fn group_key(self, path: impl Into<String>) -> Self {
        self.push(MapEntry::new(path, Binding::GroupKey))
    }

    /// Partitions rows by `column` to assemble the record list at `path`.
    pub fn group_by(
        self,
        path: impl Into<String>,
        column: impl Into<String>,
        entries: FieldMapping,
    ) -> Self {
        self.push(MapEntry::new(
            path,
            Binding::GroupBy {
                column: column.into(),
                entries: entries.entries,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_style_assembly() {
        let mapping = FieldMapping::new()
            .constant("origin", json!([0.0, 0.0, 0.0]))
            .columns("locations.coordinates", ["x", "y", "z"])
            .column("locations.values", "grade");

        assert_eq!(mapping.entries.len(), 3);
        assert_eq!(mapping.entries[1].path, "locations.coordinates");
        assert_eq!(
            mapping.entries[2].binding,
            Binding::Column("grade".into())
        );
    }

    #[test]
    fn test_group_by_nests_entries() {
        let mapping = FieldMapping::new().group_by(
            "lines",
            "line",
            FieldMapping::new()
                .group_key("line_number")
                .columns("coordinates", ["x", "y", "z"]),
        );

        match &mapping.entries[0].binding {
            Binding::GroupBy { column, entries } => {
                assert_eq!(column, "line");
                assert_eq!(entries.len(), 2);
            }
            other => panic!("unexpected binding {:?}", other),
        }
    }
}
