//! Structural validator.
//!
//! Walks a constructed object body depth-first, in parallel with its
//! schema definition's field tree, and accumulates every violation along
//! every branch. Validation never stops at the first failure: tabular
//! input commonly has several malformed columns at once, and one pass
//! must surface all of them.
//!
//! Traversal follows field declaration order, so the violation list is
//! stable and reproducible across runs. The validator never mutates the
//! body.

use serde_json::Value;

use crate::object::Body;
use crate::primitive::{
    to_bool_mask, to_count, to_flag, to_pair, to_scalar, to_text, to_triple, to_vector3, raw_kind,
};
use crate::schema::{
    FieldSpec, InvariantRule, RegistryResult, SchemaDefinition, SchemaRegistry, ValueKind,
};

use super::violation::Violation;

/// Schema validator backed by a registry.
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    /// Creates a validator over the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates a body against the definition registered for `tag`.
    ///
    /// An unknown tag is a registry error, not a violation: there is no
    /// definition to validate against.
    pub fn validate_tag(&self, tag: &str, body: &Body) -> RegistryResult<Vec<Violation>> {
        let definition = self.registry.lookup_tag(tag)?;
        Ok(validate(definition, body))
    }
}

/// Validates a body against a definition, returning every violation.
/// An empty list means the body is structurally valid.
pub fn validate(definition: &SchemaDefinition, body: &Body) -> Vec<Violation> {
    let mut violations = Vec::new();
    walk_fields(&definition.fields, body, "", &mut violations);
    violations
}

fn walk_fields(fields: &[FieldSpec], scope: &Body, prefix: &str, out: &mut Vec<Violation>) {
    // Undeclared fields first, in body order.
    for key in scope.keys() {
        if !fields.iter().any(|f| f.name == key) {
            out.push(Violation::undeclared(make_path(prefix, key)));
        }
    }

    for spec in fields {
        let path = make_path(prefix, spec.name);
        match scope.get(spec.name) {
            None => {
                if spec.required {
                    out.push(Violation::missing_required(path));
                }
            }
            Some(value) => {
                check_kind(value, &spec.kind, &path, out);
                for rule in &spec.invariants {
                    eval_rule(rule, value, scope, &path, out);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Kind checks
// ---------------------------------------------------------------------------

fn check_kind(value: &Value, kind: &ValueKind, path: &str, out: &mut Vec<Violation>) {
    match kind {
        ValueKind::Scalar => push_coerce(to_scalar(value), path, out),
        ValueKind::Count => push_coerce(to_count(value), path, out),
        ValueKind::Text => push_coerce(to_text(value), path, out),
        ValueKind::Point => push_coerce(to_vector3(value), path, out),
        ValueKind::FloatPair => push_coerce(to_pair(value), path, out),
        ValueKind::FloatTriple => push_coerce(to_triple(value), path, out),

        ValueKind::ScalarArray => {
            check_elements(value, path, out, |v, p, out| {
                push_coerce(to_scalar(v), p, out)
            });
        }
        ValueKind::CountArray => {
            check_elements(value, path, out, |v, p, out| {
                push_coerce(to_count(v), p, out)
            });
        }
        ValueKind::TextArray => {
            check_elements(value, path, out, |v, p, out| push_coerce(to_text(v), p, out));
        }
        ValueKind::BoolArray => {
            check_elements(value, path, out, |v, p, out| push_coerce(to_flag(v), p, out));
        }
        ValueKind::PointArray => {
            check_elements(value, path, out, |v, p, out| {
                push_coerce(to_vector3(v), p, out)
            });
        }
        ValueKind::TripleArray => {
            check_elements(value, path, out, |v, p, out| {
                push_coerce(to_triple(v), p, out)
            });
        }

        ValueKind::IndexArray { arity } => {
            let arity = *arity;
            check_elements(value, path, out, move |v, p, out| {
                check_index_tuple(v, arity, p, out)
            });
        }

        ValueKind::SizeArray { dims } => match value.as_array() {
            None => out.push(Violation::type_mismatch(path, kind.kind_name(), raw_kind(value))),
            Some(items) => {
                if items.len() != *dims {
                    out.push(Violation::shape_mismatch(
                        path,
                        format!("{} axis entries", dims),
                        format!("{} axis entries", items.len()),
                    ));
                }
                for (i, item) in items.iter().enumerate() {
                    push_coerce(to_count(item), &index_path(path, i), out);
                }
            }
        },

        ValueKind::Nested { fields } => match value.as_object() {
            None => out.push(Violation::type_mismatch(path, kind.kind_name(), raw_kind(value))),
            Some(obj) => walk_fields(fields, obj, path, out),
        },

        ValueKind::NestedList { fields } => match value.as_array() {
            None => out.push(Violation::type_mismatch(path, kind.kind_name(), raw_kind(value))),
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    let element_path = index_path(path, i);
                    match item.as_object() {
                        None => out.push(Violation::type_mismatch(
                            &element_path,
                            "nested record",
                            raw_kind(item),
                        )),
                        Some(obj) => walk_fields(fields, obj, &element_path, out),
                    }
                }
            }
        },
    }
}

fn check_elements(
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
    check: impl Fn(&Value, &str, &mut Vec<Violation>),
) {
    match value.as_array() {
        None => out.push(Violation::type_mismatch(path, "array", raw_kind(value))),
        Some(items) => {
            for (i, item) in items.iter().enumerate() {
                check(item, &index_path(path, i), out);
            }
        }
    }
}

fn check_index_tuple(value: &Value, arity: usize, path: &str, out: &mut Vec<Violation>) {
    match value.as_array() {
        None => out.push(Violation::type_mismatch(path, "index tuple", raw_kind(value))),
        Some(entries) => {
            if entries.len() != arity {
                out.push(Violation::shape_mismatch(
                    path,
                    format!("{} indices", arity),
                    format!("{} indices", entries.len()),
                ));
                return;
            }
            for (j, entry) in entries.iter().enumerate() {
                push_coerce(to_count(entry), &index_path(path, j), out);
            }
        }
    }
}

fn push_coerce<T>(
    result: Result<T, crate::primitive::CoerceError>,
    path: &str,
    out: &mut Vec<Violation>,
) {
    if let Err(err) = result {
        out.push(Violation::from_coerce(path, err));
    }
}

// ---------------------------------------------------------------------------
// Invariant evaluation
//
// Rules are evaluated only when their operands hold well-shaped values;
// malformed operands are skipped here because the kind checks above have
// already reported them.
// ---------------------------------------------------------------------------

fn eval_rule(
    rule: &InvariantRule,
    value: &Value,
    scope: &Body,
    path: &str,
    out: &mut Vec<Violation>,
) {
    match rule {
        InvariantRule::LengthMatches { sibling } => {
            if let (Some(own), Some(other)) = (array_len(value), sibling_len(scope, sibling)) {
                if own != other {
                    out.push(Violation::invariant_broken(
                        path,
                        format!(
                            "length {} does not match length {} of '{}'",
                            own, other, sibling
                        ),
                    ));
                }
            }
        }

        InvariantRule::CountMatchesLength { sibling } => {
            if let (Some(declared), Some(actual)) =
                (count_value(value), sibling_len(scope, sibling))
            {
                if declared != actual as u64 {
                    out.push(Violation::invariant_broken(
                        path,
                        format!(
                            "declared count {} does not match {} elements of '{}'",
                            declared, actual, sibling
                        ),
                    ));
                }
            }
        }

        InvariantRule::LengthEqualsCellCount { size } => {
            if let (Some(own), Some(cells)) = (array_len(value), cell_count(scope, size)) {
                if own as u64 != cells {
                    out.push(Violation::invariant_broken(
                        path,
                        format!(
                            "length {} does not equal cell count {} declared by '{}'",
                            own, cells, size
                        ),
                    ));
                }
            }
        }

        InvariantRule::ActiveCountMatches { count } => {
            let declared = resolve(scope, count).and_then(count_value);
            if let (Ok(mask), Some(declared)) = (to_bool_mask(value), declared) {
                let active = mask.iter().filter(|b| **b).count() as u64;
                if active != declared {
                    out.push(Violation::invariant_broken(
                        path,
                        format!("mask has {} active entries, '{}' is {}", active, count, declared),
                    ));
                }
            }
        }

        InvariantRule::IndicesWithin { target } => {
            if let Some(bound) = sibling_len(scope, target) {
                check_indices(value, bound, path, out);
            }
        }

        InvariantRule::ElementLengthMatches { field, sibling } => {
            if let Some(expected) = sibling_len(scope, sibling) {
                for_each_element_len(value, field, path, |_, len, element_path, out| {
                    if len != expected {
                        out.push(Violation::invariant_broken(
                            element_path,
                            format!(
                                "length {} does not match length {} of '{}'",
                                len, expected, sibling
                            ),
                        ));
                    }
                }, out);
            }
        }

        InvariantRule::ElementLengthEqualsCellCount { field, size } => {
            if let Some(cells) = cell_count(scope, size) {
                for_each_element_len(value, field, path, |_, len, element_path, out| {
                    if len as u64 != cells {
                        out.push(Violation::invariant_broken(
                            element_path,
                            format!(
                                "length {} does not equal cell count {} declared by '{}'",
                                len, cells, size
                            ),
                        ));
                    }
                }, out);
            }
        }

        InvariantRule::ElementLengthEqualsCornerCount { field, size } => {
            if let Some(corners) = corner_count(scope, size) {
                for_each_element_len(value, field, path, |_, len, element_path, out| {
                    if len as u64 != corners {
                        out.push(Violation::invariant_broken(
                            element_path,
                            format!(
                                "length {} does not equal corner count {} declared by '{}'",
                                len, corners, size
                            ),
                        ));
                    }
                }, out);
            }
        }

        InvariantRule::ElementLengthEqualsAxisProduct { field, axes } => {
            let product = axes
                .iter()
                .map(|axis| sibling_len(scope, axis))
                .try_fold(1usize, |acc, len| len.map(|l| acc * l));
            if let Some(product) = product {
                for_each_element_len(value, field, path, |_, len, element_path, out| {
                    if len != product {
                        out.push(Violation::invariant_broken(
                            element_path,
                            format!(
                                "length {} does not equal the {} cells spanned by {}",
                                len,
                                product,
                                axes.join(", ")
                            ),
                        ));
                    }
                }, out);
            }
        }

        InvariantRule::ElementLengthEqualsCount { field, count } => {
            if let Some(declared) = resolve(scope, count).and_then(count_value) {
                for_each_element_len(value, field, path, |_, len, element_path, out| {
                    if len as u64 != declared {
                        out.push(Violation::invariant_broken(
                            element_path,
                            format!("length {} does not equal '{}' ({})", len, count, declared),
                        ));
                    }
                }, out);
            }
        }

        InvariantRule::ElementIndicesWithin { field, target } => {
            if let (Some(bound), Some(elements)) = (sibling_len(scope, target), value.as_array()) {
                for (i, element) in elements.iter().enumerate() {
                    if let Some(entry) = element.get(*field) {
                        check_indices(entry, bound, &field_path(&index_path(path, i), field), out);
                    }
                }
            }
        }

        InvariantRule::UniformChannels { list, name } => {
            if let Some(elements) = value.as_array() {
                let mut reference: Option<(usize, Vec<&str>)> = None;
                for (i, element) in elements.iter().enumerate() {
                    let Some(names) = channel_names(element, list, name) else {
                        continue;
                    };
                    match &reference {
                        None => reference = Some((i, names)),
                        Some((first, expected)) => {
                            if &names != expected {
                                out.push(Violation::invariant_broken(
                                    field_path(&index_path(path, i), list),
                                    format!(
                                        "channel definitions differ from element {}",
                                        first
                                    ),
                                ));
                            }
                        }
                    }
                }
            }
        }

        InvariantRule::UniformElementLength { field } => {
            let mut reference: Option<(usize, usize)> = None;
            for_each_element_len(value, field, path, |i, len, element_path, out| {
                match reference {
                    None => reference = Some((i, len)),
                    Some((first, expected)) => {
                        if len != expected {
                            out.push(Violation::invariant_broken(
                                element_path,
                                format!(
                                    "length {} differs from length {} of element {}",
                                    len, expected, first
                                ),
                            ));
                        }
                    }
                }
            }, out);
        }
    }
}

/// Emits an `IndexOutOfRange` violation for every out-of-bound index in a
/// flat index array, a tuple array, or a single index value.
fn check_indices(value: &Value, bound: usize, path: &str, out: &mut Vec<Violation>) {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                check_indices(item, bound, &index_path(path, i), out);
            }
        }
        _ => {
            if let Ok(index) = to_count(value) {
                if index as usize >= bound {
                    out.push(Violation::index_out_of_range(path, index, bound));
                }
            }
        }
    }
}

fn for_each_element_len(
    value: &Value,
    field: &str,
    path: &str,
    mut visit: impl FnMut(usize, usize, &str, &mut Vec<Violation>),
    out: &mut Vec<Violation>,
) {
    if let Some(elements) = value.as_array() {
        for (i, element) in elements.iter().enumerate() {
            if let Some(len) = element.get(field).and_then(array_len) {
                visit(i, len, &field_path(&index_path(path, i), field), out);
            }
        }
    }
}

fn channel_names<'v>(element: &'v Value, list: &str, name: &str) -> Option<Vec<&'v str>> {
    element
        .get(list)?
        .as_array()?
        .iter()
        .map(|channel| channel.get(name).and_then(Value::as_str))
        .collect()
}

// ---------------------------------------------------------------------------
// Operand helpers
// ---------------------------------------------------------------------------

/// Resolves a dotted sibling path within a scope.
fn resolve<'v>(scope: &'v Body, path: &str) -> Option<&'v Value> {
    let mut segments = path.split('.');
    let mut current = scope.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn array_len(value: &Value) -> Option<usize> {
    value.as_array().map(Vec::len)
}

fn sibling_len(scope: &Body, path: &str) -> Option<usize> {
    resolve(scope, path).and_then(array_len)
}

fn count_value(value: &Value) -> Option<u64> {
    value.as_u64()
}

/// Product of a size array's entries (total cell count).
fn cell_count(scope: &Body, size: &str) -> Option<u64> {
    let sizes = resolve(scope, size)?.as_array()?;
    sizes.iter().try_fold(1u64, |acc, v| Some(acc * v.as_u64()?))
}

/// Product of (entry + 1) over a size array (total corner count).
fn corner_count(scope: &Body, size: &str) -> Option<u64> {
    let sizes = resolve(scope, size)?.as_array()?;
    sizes
        .iter()
        .try_fold(1u64, |acc, v| Some(acc * (v.as_u64()? + 1)))
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

fn field_path(path: &str, field: &str) -> String {
    format!("{}.{}", path, field)
}
