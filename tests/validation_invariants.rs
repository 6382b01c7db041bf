//! Validation Invariant Tests
//!
//! - Validation is deterministic and accumulates every violation
//! - Cardinality: attribute lengths match their collection's count
//! - Referential: index arrays resolve within their target arrays
//! - Consistency: declared counts match derived counts
//! - Required presence applies recursively

use geoforge::object::Body;
use geoforge::schema::{ObjectVariant, SchemaRegistry};
use geoforge::validate::{validate, Validator, ViolationKind};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn body(value: Value) -> Body {
    match value {
        Value::Object(map) => map,
        _ => panic!("test body must be an object"),
    }
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::bootstrap().unwrap()
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// The same body yields the same violation list every time, in the same
/// order.
#[test]
fn test_validation_is_deterministic() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::Pointset).unwrap();
    let body = body(json!({
        "locations": {
            "coordinates": [[0, 0, 0], [1, 1]],
            "values": [1.0, 2.0, 3.0],
            "labels": "wrong"
        }
    }));

    let reference = validate(definition, &body);
    assert!(!reference.is_empty());
    for _ in 0..100 {
        assert_eq!(validate(definition, &body), reference);
    }
}

/// A valid body validates cleanly every time.
#[test]
fn test_valid_body_is_stable() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::ContinuousDistribution).unwrap();
    let body = body(json!({
        "quantiles": [0.1, 0.5, 0.9],
        "values": [10.0, 55.0, 90.0]
    }));

    for _ in 0..100 {
        assert!(validate(definition, &body).is_empty());
    }
}

// =============================================================================
// Cardinality Tests
// =============================================================================

/// A pointset with 5 coordinates and 4 values fails with exactly one
/// violation referencing the values field.
#[test]
fn test_pointset_cardinality() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::Pointset).unwrap();
    let body = body(json!({
        "locations": {
            "coordinates": [[0, 0, 0], [1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4]],
            "values": [1.0, 2.0, 3.0, 4.0]
        }
    }));

    let violations = validate(definition, &body);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::InvariantBroken);
    assert_eq!(violations[0].path, "locations.values");
}

/// Grid cell attributes must match the cell count declared by size.
#[test]
fn test_grid_cell_attribute_cardinality() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::Regular3dGrid).unwrap();
    let mut grid = body(json!({
        "origin": [0.0, 0.0, 0.0],
        "size": [2, 2, 3],
        "cell_size": [1.0, 1.0, 1.0],
        "cell_attributes": [
            {"name": "density", "values": [1.0, 1.0, 1.0, 1.0, 1.0]}
        ]
    }));

    let violations = validate(definition, &grid);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "cell_attributes[0].values");

    // 2 * 2 * 3 = 12 values validates cleanly.
    grid.insert(
        "cell_attributes".into(),
        json!([{"name": "density", "values": vec![1.0; 12]}]),
    );
    assert!(validate(definition, &grid).is_empty());
}

/// Attribute tables require uniform column lengths.
#[test]
fn test_attribute_table_uniform_lengths() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::AttributeTable).unwrap();
    let table = body(json!({
        "columns": [
            {"name": "au", "values": [0.5, 0.7, 0.9]},
            {"name": "ag", "values": [1.1, 1.3]}
        ]
    }));

    let violations = validate(definition, &table);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "columns[1].values");
}

// =============================================================================
// Referential Tests
// =============================================================================

/// A triangle referencing a vertex past the end fails with
/// IndexOutOfRange on the offending index.
#[test]
fn test_triangle_mesh_index_bounds() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::TriangleMesh).unwrap();
    let mesh = body(json!({
        "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
        "indices": [[0, 1, 3]]
    }));

    let violations = validate(definition, &mesh);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::IndexOutOfRange);
    assert_eq!(violations[0].path, "indices[0][2]");
}

/// Every out-of-bound index is reported, not just the first.
#[test]
fn test_all_offending_indices_reported() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::LineSegments).unwrap();
    let lines = body(json!({
        "vertices": [[0, 0, 0], [1, 0, 0]],
        "indices": [[0, 5], [7, 1]]
    }));

    let violations = validate(definition, &lines);
    let out_of_range: Vec<_> = violations
        .iter()
        .filter(|v| v.kind == ViolationKind::IndexOutOfRange)
        .collect();
    assert_eq!(out_of_range.len(), 2);
    assert_eq!(out_of_range[0].path, "indices[0][1]");
    assert_eq!(out_of_range[1].path, "indices[1][0]");
}

/// Downhole survey records must reference an existing collar.
#[test]
fn test_downhole_survey_hole_reference() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::DownholeCollection).unwrap();
    let collection = body(json!({
        "collars": {
            "coordinates": [[500.0, 600.0, 120.0], [510.0, 600.0, 121.0]],
            "hole_ids": ["DH-001", "DH-002"]
        },
        "surveys": [
            {"hole": 1, "depths": [0.0, 10.0], "azimuths": [45.0, 46.0], "dips": [-60.0, -61.0]},
            {"hole": 2, "depths": [0.0], "azimuths": [90.0], "dips": [-55.0]}
        ]
    }));

    let violations = validate(definition, &collection);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::IndexOutOfRange);
    assert_eq!(violations[0].path, "surveys[1].hole");
}

// =============================================================================
// Consistency Tests
// =============================================================================

/// Masked grid: declared active-cell count must match the mask.
#[test]
fn test_masked_grid_count_consistency() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::RegularMasked3dGrid).unwrap();
    let mut grid = body(json!({
        "origin": [0.0, 0.0, 0.0],
        "size": [4, 1, 1],
        "cell_size": [5.0, 5.0, 5.0],
        "mask": [true, false, true, true],
        "number_of_active_cells": 2
    }));

    let violations = validate(definition, &grid);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::InvariantBroken);
    assert!(violations[0].detail.contains('3'));
    assert!(violations[0].detail.contains('2'));

    grid.insert("number_of_active_cells".into(), json!(3));
    assert!(validate(definition, &grid).is_empty());
}

/// Masked grid: cell attributes align with active cells, not full cells.
#[test]
fn test_masked_grid_attributes_use_active_count() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::RegularMasked3dGrid).unwrap();
    let grid = body(json!({
        "origin": [0.0, 0.0, 0.0],
        "size": [4, 1, 1],
        "cell_size": [5.0, 5.0, 5.0],
        "mask": [true, false, true, true],
        "number_of_active_cells": 3,
        "cell_attributes": [
            {"name": "grade", "values": [0.2, 0.4, 0.6, 0.8]}
        ]
    }));

    let violations = validate(definition, &grid);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "cell_attributes[0].values");
}

/// Variogram: declared structure count must match the structure list.
#[test]
fn test_variogram_structure_count() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::Variogram).unwrap();
    let model = body(json!({
        "nugget": 0.1,
        "number_of_structures": 2,
        "structures": [
            {"model": "spherical", "variance": 0.6, "ranges": [120.0, 80.0, 20.0], "rotation": [0.0, 0.0, 35.0]}
        ]
    }));

    let violations = validate(definition, &model);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "number_of_structures");
}

/// Survey lines must declare identical channel sequences.
#[test]
fn test_survey_channel_uniformity() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::AirborneEmSurvey).unwrap();
    let survey = body(json!({
        "lines": [
            {
                "line_number": 100,
                "coordinates": [[0, 0, 120], [50, 0, 121]],
                "channels": [
                    {"name": "em_z", "values": [1.0, 1.1]},
                    {"name": "em_x", "values": [0.2, 0.3]}
                ]
            },
            {
                "line_number": 110,
                "coordinates": [[0, 200, 120]],
                "channels": [
                    {"name": "em_z", "values": [0.9]}
                ]
            }
        ]
    }));

    let violations = validate(definition, &survey);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::InvariantBroken);
    assert_eq!(violations[0].path, "lines[1].channels");
}

// =============================================================================
// Accumulation Tests
// =============================================================================

/// One pass surfaces defects from every branch at once.
#[test]
fn test_violations_accumulate_across_branches() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::TriangleMesh).unwrap();
    let mesh = body(json!({
        // vertices missing entirely
        "indices": [[0, "x", 1]],
        "vertex_attributes": "not-a-list"
    }));

    let violations = validate(definition, &mesh);
    let kinds: Vec<_> = violations.iter().map(|v| v.kind).collect();
    assert!(kinds.contains(&ViolationKind::MissingRequired));
    assert!(kinds.contains(&ViolationKind::TypeMismatch));
    assert!(violations.len() >= 3);
}

/// Required presence applies recursively inside nested records.
#[test]
fn test_nested_required_presence() {
    let registry = registry();
    let definition = registry.lookup(ObjectVariant::DownholeCollection).unwrap();
    let collection = body(json!({
        "collars": { "coordinates": [[0, 0, 0]] },
        "surveys": [
            {"hole": 0, "depths": [0.0]}
        ]
    }));

    let violations = validate(definition, &collection);
    let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
    assert!(paths.contains(&"collars.hole_ids"));
    assert!(paths.contains(&"surveys[0].azimuths"));
    assert!(paths.contains(&"surveys[0].dips"));
}

// =============================================================================
// Registry-Backed Validator Tests
// =============================================================================

/// The validator rejects unknown tags before walking anything.
#[test]
fn test_validator_unknown_tag() {
    let registry = registry();
    let validator = Validator::new(&registry);
    let err = validator
        .validate_tag("not-a-real-schema", &Body::new())
        .unwrap_err();
    assert_eq!(err.code().code(), "GEO_UNKNOWN_VARIANT");
}

/// The registry-backed entry point matches direct validation.
#[test]
fn test_validator_matches_direct_validation() {
    let registry = registry();
    let validator = Validator::new(&registry);
    let pointset = body(json!({
        "locations": { "coordinates": [[1.0, 2.0, 3.0]] }
    }));

    let via_tag = validator.validate_tag("pointset", &pointset).unwrap();
    let direct = validate(registry.lookup(ObjectVariant::Pointset).unwrap(), &pointset);
    assert_eq!(via_tag, direct);
    assert!(via_tag.is_empty());
}
