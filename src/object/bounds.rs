//! Base-property derivation for validated bodies.
//!
//! The bounding box is the componentwise min/max over every
//! coordinate-bearing structure reachable from the object: point arrays
//! anywhere in the tree, single spatial points, and grid extents
//! (origin plus the span declared by sizes/cell sizes or spacings).
//! Non-spatial triples (variogram ranges, rotations) never contribute.
//!
//! Derivation is pure and assumes a validated body: malformed values are
//! skipped, never reported, because the validator has already rejected
//! them upstream of this pass.

use serde_json::Value;

use crate::primitive::to_vector3;
use crate::schema::{FieldSpec, SchemaDefinition, ValueKind};

use super::base::{Body, BoundingBox};

/// Where an object's bounding box came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsProvenance {
    /// Computed from the object's own coordinate data
    Computed,
    /// Taken from a caller-supplied reference geometry
    Reference,
    /// The object carries no coordinate data and no reference was given
    Undefined,
}

/// Derives the bounding box for a validated body, falling back to the
/// supplied reference geometry when the variant carries no coordinates.
///
/// An undefined box is flagged through the provenance value, never
/// silently zeroed.
pub fn derive(
    definition: &SchemaDefinition,
    body: &Body,
    reference: Option<BoundingBox>,
) -> (Option<BoundingBox>, BoundsProvenance) {
    match scan(definition, body) {
        Some(bounds) => (Some(bounds), BoundsProvenance::Computed),
        None => match reference {
            Some(bounds) => (Some(bounds), BoundsProvenance::Reference),
            None => (None, BoundsProvenance::Undefined),
        },
    }
}

/// Componentwise min/max across all coordinate data in the body, or None
/// when the variant carries none.
pub fn scan(definition: &SchemaDefinition, body: &Body) -> Option<BoundingBox> {
    let mut bounds = None;
    scan_fields(&definition.fields, body, &mut bounds);
    bounds
}

fn scan_fields(fields: &[FieldSpec], scope: &Body, bounds: &mut Option<BoundingBox>) {
    for spec in fields {
        let Some(value) = scope.get(spec.name) else {
            continue;
        };
        match &spec.kind {
            ValueKind::Point => {
                if let Ok(point) = to_vector3(value) {
                    include(bounds, point);
                    // A grid origin also spans to the opposite corner.
                    if spec.name == "origin" {
                        if let Some(corner) = grid_corner(scope, point) {
                            include(bounds, corner);
                        }
                    }
                }
            }
            ValueKind::PointArray => {
                if let Some(items) = value.as_array() {
                    for item in items {
                        if let Ok(point) = to_vector3(item) {
                            include(bounds, point);
                        }
                    }
                }
            }
            ValueKind::Nested { fields } => {
                if let Some(obj) = value.as_object() {
                    scan_fields(fields, obj, bounds);
                }
            }
            ValueKind::NestedList { fields } => {
                if let Some(items) = value.as_array() {
                    for item in items {
                        if let Some(obj) = item.as_object() {
                            scan_fields(fields, obj, bounds);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn include(bounds: &mut Option<BoundingBox>, point: [f64; 3]) {
    match bounds {
        None => *bounds = Some(BoundingBox::at(point)),
        Some(bounds) => bounds.include(point),
    }
}

/// The corner opposite a grid origin: origin plus per-axis size spans,
/// or plus summed spacings for tensor grids. Axes the grid does not
/// declare keep the origin's component.
fn grid_corner(scope: &Body, origin: [f64; 3]) -> Option<[f64; 3]> {
    if let (Some(size), Some(cell_size)) = (scope.get("size"), scope.get("cell_size")) {
        let sizes = numbers(size)?;
        let cells = numbers(cell_size)?;
        if sizes.len() != cells.len() {
            return None;
        }
        let mut corner = origin;
        for (axis, (count, span)) in sizes.iter().zip(&cells).enumerate().take(3) {
            corner[axis] = origin[axis] + count * span;
        }
        return Some(corner);
    }

    let mut spanned = false;
    let mut corner = origin;
    for (axis, key) in ["spacings_x", "spacings_y", "spacings_z"].iter().enumerate() {
        if let Some(spacings) = scope.get(*key).and_then(numbers) {
            corner[axis] = origin[axis] + spacings.iter().sum::<f64>();
            spanned = true;
        }
    }
    spanned.then_some(corner)
}

fn numbers(value: &Value) -> Option<Vec<f64>> {
    value
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<f64>>>()
}
