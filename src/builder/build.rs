//! Object construction from columnar input.
//!
//! Construction is all-or-nothing: the builder assembles a draft body in
//! one streaming pass, validates it, and either returns a fully derived
//! object or the complete violation list. A partially valid object never
//! escapes.
//!
//! Assembly is bottom-up: leaf arrays are collected first, composites
//! around them, and cross-referencing checks (index bounds, declared
//! counts) run against the finished draft. Raw cell values are carried
//! as-is into the draft; the validator owns every coercion check, so a
//! malformed cell becomes a reported violation rather than a build abort.

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crate::adapter::CrsResolver;
use crate::object::{self, Body, BoundingBox, BoundsProvenance, GeoscienceObject, Lineage, SchemaTag};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{resolve_in, FieldSpec, SchemaDefinition, SchemaRegistry, ValueKind};
use crate::validate::{validate, Violation};

use super::errors::{BuildError, BuildResult};
use super::mapping::{Binding, FieldMapping, MapEntry};
use super::rows::{Record, RowSource};

/// One construction request.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Variant tag selecting the schema definition
    pub variant: String,
    /// Object name
    pub name: String,
    /// CRS identifier, resolved through the caller's resolver
    pub crs: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional key/value tags
    pub tags: BTreeMap<String, String>,
    /// Optional provenance record
    pub lineage: Option<Lineage>,
    /// Reference geometry for variants that carry no coordinates
    pub reference_bounds: Option<BoundingBox>,
}

impl BuildRequest {
    pub fn new(
        variant: impl Into<String>,
        name: impl Into<String>,
        crs: impl Into<String>,
    ) -> Self {
        Self {
            variant: variant.into(),
            name: name.into(),
            crs: crs.into(),
            description: None,
            tags: BTreeMap::new(),
            lineage: None,
            reference_bounds: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_lineage(mut self, lineage: Lineage) -> Self {
        self.lineage = Some(lineage);
        self
    }

    pub fn with_reference_bounds(mut self, bounds: BoundingBox) -> Self {
        self.reference_bounds = Some(bounds);
        self
    }
}

/// A successful construction: the object plus where its bounds came from.
#[derive(Debug, Clone)]
pub struct Built {
    pub object: GeoscienceObject,
    /// Computed, reference-supplied, or undefined; an undefined box is
    /// flagged here rather than silently zeroed
    pub bounds: BoundsProvenance,
}

/// Object builder over a bootstrapped registry.
pub struct ObjectBuilder<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> ObjectBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Builds a validated object from a row stream.
    ///
    /// Streams the source exactly once. Early truncation of the stream is
    /// tolerated: whatever is missing surfaces as ordinary violations.
    pub fn build(
        &self,
        request: &BuildRequest,
        mapping: &FieldMapping,
        source: &dyn RowSource,
        crs_resolver: &dyn CrsResolver,
    ) -> BuildResult<Built> {
        log_event_with_fields(Event::BuildStart, &[("variant", &request.variant)]);

        let definition = self
            .registry
            .lookup_tag(&request.variant)
            .map_err(|_| BuildError::UnknownVariant(request.variant.clone()))?;

        let mut collectors = plan(definition, mapping)?;
        let crs = crs_resolver.resolve(&request.crs)?;

        for row in source.rows()? {
            let record = row?;
            for collector in &mut collectors {
                collector.feed(&record);
            }
        }

        let mut body = Body::new();
        for collector in collectors {
            collector.finish(&mut body);
        }
        apply_defaults(&definition.fields, &mut body);

        let mut violations = validate(definition, &body);
        if request.name.trim().is_empty() {
            violations.insert(0, Violation::missing_required("name"));
        }
        if !violations.is_empty() {
            log_event_with_fields(
                Event::BuildRejected,
                &[
                    ("variant", request.variant.as_str()),
                    ("violations", &violations.len().to_string()),
                ],
            );
            return Err(BuildError::SchemaViolation { violations });
        }

        let (bounding_box, bounds) = object::derive(definition, &body, request.reference_bounds);
        let object = GeoscienceObject {
            name: request.name.clone(),
            uuid: Uuid::new_v4(),
            schema: SchemaTag::new(definition.variant, definition.version),
            coordinate_reference_system: crs,
            bounding_box,
            description: request.description.clone(),
            tags: request.tags.clone(),
            extensions: Body::new(),
            lineage: request.lineage.clone(),
            body,
        };

        log_event_with_fields(
            Event::BuildAccepted,
            &[
                ("variant", request.variant.as_str()),
                ("uuid", &object.uuid.to_string()),
            ],
        );
        Ok(Built { object, bounds })
    }
}

// ---------------------------------------------------------------------------
// Mapping plan
// ---------------------------------------------------------------------------

/// Validates the mapping against the definition and produces one stateful
/// collector per entry. Everything that can contradict the catalogue
/// (unresolvable path, wrong tuple arity, misplaced group key) fails here,
/// before a single row is pulled.
fn plan(definition: &SchemaDefinition, mapping: &FieldMapping) -> BuildResult<Vec<Collector>> {
    mapping
        .entries
        .iter()
        .map(|entry| plan_entry(&definition.fields, entry, false))
        .collect()
}

fn plan_entry(fields: &[FieldSpec], entry: &MapEntry, in_group: bool) -> BuildResult<Collector> {
    let spec = resolve_in(fields, &entry.path).ok_or_else(|| {
        BuildError::mapping(&entry.path, "path does not resolve to a catalogued field")
    })?;

    match &entry.binding {
        Binding::Constant(value) => Ok(Collector::Constant {
            path: entry.path.clone(),
            value: value.clone(),
        }),

        Binding::Column(column) => {
            let mode = match &spec.kind {
                ValueKind::ScalarArray
                | ValueKind::CountArray
                | ValueKind::TextArray
                | ValueKind::BoolArray => ColumnMode::Stream,
                ValueKind::Scalar | ValueKind::Count | ValueKind::Text => ColumnMode::First,
                other => {
                    return Err(BuildError::mapping(
                        &entry.path,
                        format!("a single column cannot populate a {}", other.kind_name()),
                    ))
                }
            };
            Ok(Collector::Column {
                path: entry.path.clone(),
                column: column.clone(),
                mode,
                values: Vec::new(),
            })
        }

        Binding::Columns(columns) => {
            let arity = match &spec.kind {
                ValueKind::PointArray | ValueKind::TripleArray => 3,
                ValueKind::IndexArray { arity } => *arity,
                other => {
                    return Err(BuildError::mapping(
                        &entry.path,
                        format!("a column tuple cannot populate a {}", other.kind_name()),
                    ))
                }
            };
            if columns.len() != arity {
                return Err(BuildError::mapping(
                    &entry.path,
                    format!(
                        "field needs {} columns per row, mapping names {}",
                        arity,
                        columns.len()
                    ),
                ));
            }
            Ok(Collector::Tuple {
                path: entry.path.clone(),
                columns: columns.clone(),
                values: Vec::new(),
            })
        }

        Binding::AttributeColumns(columns) => {
            let ok = matches!(
                &spec.kind,
                ValueKind::NestedList { fields }
                    if fields.iter().any(|f| f.name == "values")
                        && fields.iter().any(|f| f.name == "name")
            );
            if !ok {
                return Err(BuildError::mapping(
                    &entry.path,
                    "attribute columns need a named-attribute list field",
                ));
            }
            Ok(Collector::Attributes {
                path: entry.path.clone(),
                columns: columns.clone(),
                values: vec![Vec::new(); columns.len()],
            })
        }

        Binding::GroupKey => {
            if !in_group {
                return Err(BuildError::mapping(
                    &entry.path,
                    "group key is only valid inside a group binding",
                ));
            }
            match &spec.kind {
                ValueKind::Scalar | ValueKind::Count | ValueKind::Text => Ok(Collector::Key {
                    path: entry.path.clone(),
                    value: None,
                }),
                other => Err(BuildError::mapping(
                    &entry.path,
                    format!("a group key cannot populate a {}", other.kind_name()),
                )),
            }
        }

        Binding::GroupBy { column, entries } => {
            if in_group {
                return Err(BuildError::mapping(&entry.path, "groups cannot be nested"));
            }
            let element_fields = match &spec.kind {
                ValueKind::NestedList { fields } => fields,
                other => {
                    return Err(BuildError::mapping(
                        &entry.path,
                        format!("grouping cannot populate a {}", other.kind_name()),
                    ))
                }
            };
            let template = entries
                .iter()
                .map(|inner| plan_entry(element_fields, inner, true))
                .collect::<BuildResult<Vec<_>>>()?;
            Ok(Collector::Group {
                path: entry.path.clone(),
                column: column.clone(),
                template,
                groups: Vec::new(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Collectors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnMode {
    /// One array element per row
    Stream,
    /// Single-valued field: first populated row wins
    First,
}

#[derive(Debug, Clone)]
enum Collector {
    Constant {
        path: String,
        value: Value,
    },
    Column {
        path: String,
        column: String,
        mode: ColumnMode,
        values: Vec<Value>,
    },
    Tuple {
        path: String,
        columns: Vec<String>,
        values: Vec<Value>,
    },
    Attributes {
        path: String,
        columns: Vec<String>,
        values: Vec<Vec<Value>>,
    },
    Key {
        path: String,
        value: Option<Value>,
    },
    Group {
        path: String,
        column: String,
        template: Vec<Collector>,
        groups: Vec<(Value, Vec<Collector>)>,
    },
}

impl Collector {
    fn feed(&mut self, record: &Record) {
        match self {
            Collector::Constant { .. } | Collector::Key { .. } => {}

            Collector::Column {
                column,
                mode,
                values,
                ..
            } => {
                if let Some(value) = cell(record, column) {
                    match mode {
                        ColumnMode::Stream => values.push(value.clone()),
                        ColumnMode::First => {
                            if values.is_empty() {
                                values.push(value.clone());
                            }
                        }
                    }
                }
            }

            Collector::Tuple {
                columns, values, ..
            } => {
                // A row where every tuple column is blank is skipped (the
                // ragged-CSV case); a partially blank tuple is kept and
                // surfaces as a validator violation.
                let cells: Vec<Option<&Value>> =
                    columns.iter().map(|c| cell(record, c)).collect();
                if cells.iter().all(Option::is_none) {
                    return;
                }
                values.push(Value::Array(
                    cells
                        .into_iter()
                        .map(|c| c.cloned().unwrap_or(Value::Null))
                        .collect(),
                ));
            }

            Collector::Attributes {
                columns, values, ..
            } => {
                for (column, column_values) in columns.iter().zip(values.iter_mut()) {
                    if let Some(value) = cell(record, column) {
                        column_values.push(value.clone());
                    }
                }
            }

            Collector::Group {
                column,
                template,
                groups,
                ..
            } => {
                let Some(key) = cell(record, column).cloned() else {
                    return;
                };
                let collectors = match groups.iter_mut().position(|(k, _)| *k == key) {
                    Some(i) => &mut groups[i].1,
                    None => {
                        let mut collectors = template.clone();
                        for collector in &mut collectors {
                            if let Collector::Key { value, .. } = collector {
                                *value = Some(key.clone());
                            }
                        }
                        groups.push((key, collectors));
                        &mut groups.last_mut().expect("just pushed").1
                    }
                };
                for collector in collectors {
                    collector.feed(record);
                }
            }
        }
    }

    fn finish(self, body: &mut Body) {
        match self {
            Collector::Constant { path, value } => insert_at_path(body, &path, value),

            Collector::Column {
                path, mode, values, ..
            } => match mode {
                // A column that never appeared leaves the field absent so
                // required-presence checks fire instead of cardinality ones.
                ColumnMode::Stream => {
                    if !values.is_empty() {
                        insert_at_path(body, &path, Value::Array(values));
                    }
                }
                ColumnMode::First => {
                    if let Some(value) = values.into_iter().next() {
                        insert_at_path(body, &path, value);
                    }
                }
            },

            Collector::Tuple { path, values, .. } => {
                if !values.is_empty() {
                    insert_at_path(body, &path, Value::Array(values));
                }
            }

            Collector::Attributes {
                path,
                columns,
                values,
            } => {
                let attributes: Vec<Value> = columns
                    .into_iter()
                    .zip(values)
                    .filter(|(_, values)| !values.is_empty())
                    .map(|(name, values)| {
                        let mut attribute = Body::new();
                        attribute.insert("name".into(), Value::String(name));
                        attribute.insert("values".into(), Value::Array(values));
                        Value::Object(attribute)
                    })
                    .collect();
                if !attributes.is_empty() {
                    insert_at_path(body, &path, Value::Array(attributes));
                }
            }

            Collector::Key { path, value } => {
                if let Some(value) = value {
                    insert_at_path(body, &path, value);
                }
            }

            Collector::Group { path, groups, .. } => {
                if groups.is_empty() {
                    return;
                }
                let elements: Vec<Value> = groups
                    .into_iter()
                    .map(|(_, collectors)| {
                        let mut element = Body::new();
                        for collector in collectors {
                            collector.finish(&mut element);
                        }
                        Value::Object(element)
                    })
                    .collect();
                insert_at_path(body, &path, Value::Array(elements));
            }
        }
    }
}

/// A populated cell. Empty strings and nulls count as absent: that is how
/// ragged CSV exports arrive.
fn cell<'r>(record: &'r Record, column: &str) -> Option<&'r Value> {
    match record.get(column) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(value),
    }
}

fn insert_at_path(body: &mut Body, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            body.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = body
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Body::new()));
            if let Value::Object(map) = entry {
                insert_at_path(map, rest, value);
            }
        }
    }
}

/// Defaults for absent optional fields: record lists default to empty,
/// everything else stays absent. Required fields are never defaulted;
/// their absence must surface as a violation.
fn apply_defaults(fields: &[FieldSpec], scope: &mut Body) {
    for spec in fields {
        match &spec.kind {
            ValueKind::NestedList { .. } => {
                if !spec.required && !scope.contains_key(spec.name) {
                    scope.insert(spec.name.to_string(), Value::Array(Vec::new()));
                }
            }
            ValueKind::Nested { fields } => {
                if let Some(Value::Object(nested)) = scope.get_mut(spec.name) {
                    apply_defaults(fields, nested);
                }
            }
            _ => {}
        }
    }
}
