//! Embedded schema catalogue per CATALOG.md
//!
//! One entry per catalogued variant, field-for-field with the published
//! tables: required/optional markers, nested shapes and every attached
//! invariant. The registry is populated from this table exactly once at
//! start-up; nothing here is consulted again after bootstrap.

use super::types::{FieldSpec, InvariantRule, ObjectVariant, SchemaDefinition, ValueKind};

use InvariantRule::*;
use ObjectVariant::*;

/// The full embedded table, in catalogue order.
pub fn catalog() -> Vec<SchemaDefinition> {
    vec![
        pointset(),
        line_segments(),
        triangle_mesh(),
        geological_model_meshes(),
        regular_2d_grid(),
        tensor_2d_grid(),
        regular_3d_grid(),
        regular_masked_3d_grid(),
        tensor_3d_grid(),
        unstructured_grid(),
        unstructured_cell_grid(UnstructuredTetGrid, "1.0.0", 4),
        unstructured_cell_grid(UnstructuredHexGrid, "1.0.0", 8),
        unstructured_cell_grid(UnstructuredQuadGrid, "1.0.0", 4),
        downhole_collection(),
        downhole_intervals(),
        blasthole_collection(),
        attribute_table(),
        variogram(),
        global_ellipsoid(),
        local_ellipsoids(),
        continuous_distribution(),
        survey(AirborneMagneticSurvey, "1.0.0", airborne_extras()),
        survey(AirborneRadiometricSurvey, "1.0.0", airborne_extras()),
        survey(
            AirborneEmSurvey,
            "1.0.0",
            vec![
                FieldSpec::optional("system", ValueKind::Text),
                FieldSpec::optional("nominal_flight_height", ValueKind::Scalar),
            ],
        ),
        survey(GroundMagneticSurvey, "1.0.0", vec![]),
        survey(GroundGravitySurvey, "1.0.0", vec![]),
        survey(
            DcipSurvey,
            "1.0.0",
            vec![FieldSpec::optional("electrode_spacing", ValueKind::Scalar)],
        ),
        structural_data(),
        geophysical_records_1d(),
    ]
}

// ---------------------------------------------------------------------------
// Shared composites
// ---------------------------------------------------------------------------

/// `{name, values}` attribute list whose per-element rules are supplied by
/// the owning variant.
fn attribute_list(name: &'static str) -> FieldSpec {
    FieldSpec::optional(
        name,
        ValueKind::NestedList {
            fields: vec![
                FieldSpec::required("name", ValueKind::Text),
                FieldSpec::required("values", ValueKind::ScalarArray),
            ],
        },
    )
}

/// Coordinates plus the optional per-point attribute arrays.
fn locations() -> FieldSpec {
    FieldSpec::required(
        "locations",
        ValueKind::Nested {
            fields: vec![
                FieldSpec::required("coordinates", ValueKind::PointArray),
                FieldSpec::optional("values", ValueKind::ScalarArray)
                    .with(LengthMatches {
                        sibling: "coordinates",
                    }),
                FieldSpec::optional("colors", ValueKind::CountArray).with(LengthMatches {
                    sibling: "coordinates",
                }),
                FieldSpec::optional("labels", ValueKind::TextArray).with(LengthMatches {
                    sibling: "coordinates",
                }),
            ],
        },
    )
}

/// Bare coordinates composite for variants that attach their attribute
/// arrays as siblings of `locations`.
fn bare_locations() -> FieldSpec {
    FieldSpec::required(
        "locations",
        ValueKind::Nested {
            fields: vec![FieldSpec::required("coordinates", ValueKind::PointArray)],
        },
    )
}

/// Vertices plus a fixed-arity index list bounded by them.
fn indexed_geometry(arity: usize) -> Vec<FieldSpec> {
    vec![
        FieldSpec::required("vertices", ValueKind::PointArray),
        FieldSpec::required("indices", ValueKind::IndexArray { arity }).with(IndicesWithin {
            target: "vertices",
        }),
    ]
}

/// Survey line list shared by all survey variants: every channel's values
/// align with the line's coordinates, and the ordered channel-name
/// sequence is identical across lines.
fn survey_lines() -> FieldSpec {
    FieldSpec::required(
        "lines",
        ValueKind::NestedList {
            fields: vec![
                FieldSpec::required("line_number", ValueKind::Count),
                FieldSpec::required("coordinates", ValueKind::PointArray),
                FieldSpec::required(
                    "channels",
                    ValueKind::NestedList {
                        fields: vec![
                            FieldSpec::required("name", ValueKind::Text),
                            FieldSpec::required("values", ValueKind::ScalarArray),
                        ],
                    },
                )
                .with(ElementLengthMatches {
                    field: "values",
                    sibling: "coordinates",
                }),
            ],
        },
    )
    .with(UniformChannels {
        list: "channels",
        name: "name",
    })
}

fn airborne_extras() -> Vec<FieldSpec> {
    vec![FieldSpec::optional(
        "nominal_flight_height",
        ValueKind::Scalar,
    )]
}

// ---------------------------------------------------------------------------
// Points, lines, meshes
// ---------------------------------------------------------------------------

fn pointset() -> SchemaDefinition {
    SchemaDefinition::new(Pointset, "1.2.0", vec![locations()])
}

fn line_segments() -> SchemaDefinition {
    let mut fields = indexed_geometry(2);
    fields.push(attribute_list("segment_attributes").with(ElementLengthMatches {
        field: "values",
        sibling: "indices",
    }));
    fields.push(attribute_list("vertex_attributes").with(ElementLengthMatches {
        field: "values",
        sibling: "vertices",
    }));
    SchemaDefinition::new(LineSegments, "2.0.0", fields)
}

fn triangle_mesh() -> SchemaDefinition {
    let mut fields = indexed_geometry(3);
    fields.push(attribute_list("vertex_attributes").with(ElementLengthMatches {
        field: "values",
        sibling: "vertices",
    }));
    fields.push(attribute_list("triangle_attributes").with(ElementLengthMatches {
        field: "values",
        sibling: "indices",
    }));
    SchemaDefinition::new(TriangleMesh, "2.1.0", fields)
}

fn geological_model_meshes() -> SchemaDefinition {
    let mesh_fields = || {
        let mut fields = vec![FieldSpec::required("name", ValueKind::Text)];
        fields.extend(indexed_geometry(3));
        fields
    };
    SchemaDefinition::new(
        GeologicalModelMeshes,
        "1.0.0",
        vec![
            FieldSpec::required(
                "volumes",
                ValueKind::NestedList {
                    fields: mesh_fields(),
                },
            ),
            FieldSpec::optional(
                "surfaces",
                ValueKind::NestedList {
                    fields: mesh_fields(),
                },
            ),
        ],
    )
}

// ---------------------------------------------------------------------------
// Grids
// ---------------------------------------------------------------------------

fn regular_2d_grid() -> SchemaDefinition {
    SchemaDefinition::new(
        Regular2dGrid,
        "1.1.0",
        vec![
            FieldSpec::required("origin", ValueKind::Point),
            FieldSpec::required("size", ValueKind::SizeArray { dims: 2 }),
            FieldSpec::required("cell_size", ValueKind::FloatPair),
            attribute_list("cell_attributes").with(ElementLengthEqualsCellCount {
                field: "values",
                size: "size",
            }),
            attribute_list("vertex_attributes").with(ElementLengthEqualsCornerCount {
                field: "values",
                size: "size",
            }),
        ],
    )
}

fn tensor_2d_grid() -> SchemaDefinition {
    SchemaDefinition::new(
        Tensor2dGrid,
        "1.0.1",
        vec![
            FieldSpec::required("origin", ValueKind::Point),
            FieldSpec::required("spacings_x", ValueKind::ScalarArray),
            FieldSpec::required("spacings_y", ValueKind::ScalarArray),
            attribute_list("cell_attributes").with(ElementLengthEqualsAxisProduct {
                field: "values",
                axes: &["spacings_x", "spacings_y"],
            }),
        ],
    )
}

fn regular_3d_grid() -> SchemaDefinition {
    SchemaDefinition::new(
        Regular3dGrid,
        "1.1.0",
        vec![
            FieldSpec::required("origin", ValueKind::Point),
            FieldSpec::required("size", ValueKind::SizeArray { dims: 3 }),
            FieldSpec::required("cell_size", ValueKind::FloatTriple),
            attribute_list("cell_attributes").with(ElementLengthEqualsCellCount {
                field: "values",
                size: "size",
            }),
            attribute_list("vertex_attributes").with(ElementLengthEqualsCornerCount {
                field: "values",
                size: "size",
            }),
        ],
    )
}

fn regular_masked_3d_grid() -> SchemaDefinition {
    SchemaDefinition::new(
        RegularMasked3dGrid,
        "1.1.0",
        vec![
            FieldSpec::required("origin", ValueKind::Point),
            FieldSpec::required("size", ValueKind::SizeArray { dims: 3 }),
            FieldSpec::required("cell_size", ValueKind::FloatTriple),
            FieldSpec::required("mask", ValueKind::BoolArray)
                .with(LengthEqualsCellCount { size: "size" })
                .with(ActiveCountMatches {
                    count: "number_of_active_cells",
                }),
            FieldSpec::required("number_of_active_cells", ValueKind::Count),
            attribute_list("cell_attributes").with(ElementLengthEqualsCount {
                field: "values",
                count: "number_of_active_cells",
            }),
        ],
    )
}

fn tensor_3d_grid() -> SchemaDefinition {
    SchemaDefinition::new(
        Tensor3dGrid,
        "1.0.1",
        vec![
            FieldSpec::required("origin", ValueKind::Point),
            FieldSpec::required("spacings_x", ValueKind::ScalarArray),
            FieldSpec::required("spacings_y", ValueKind::ScalarArray),
            FieldSpec::required("spacings_z", ValueKind::ScalarArray),
            attribute_list("cell_attributes").with(ElementLengthEqualsAxisProduct {
                field: "values",
                axes: &["spacings_x", "spacings_y", "spacings_z"],
            }),
        ],
    )
}

fn unstructured_grid() -> SchemaDefinition {
    SchemaDefinition::new(
        UnstructuredGrid,
        "1.0.0",
        vec![
            FieldSpec::required("vertices", ValueKind::PointArray),
            FieldSpec::required(
                "cells",
                ValueKind::NestedList {
                    fields: vec![FieldSpec::required("indices", ValueKind::CountArray)],
                },
            )
            .with(ElementIndicesWithin {
                field: "indices",
                target: "vertices",
            }),
            attribute_list("cell_attributes").with(ElementLengthMatches {
                field: "values",
                sibling: "cells",
            }),
        ],
    )
}

/// Fixed-cell-arity unstructured grids (tet/hex/quad) share one shape.
fn unstructured_cell_grid(
    variant: ObjectVariant,
    version: &'static str,
    arity: usize,
) -> SchemaDefinition {
    let mut fields = indexed_geometry(arity);
    fields.push(attribute_list("cell_attributes").with(ElementLengthMatches {
        field: "values",
        sibling: "indices",
    }));
    fields.push(attribute_list("vertex_attributes").with(ElementLengthMatches {
        field: "values",
        sibling: "vertices",
    }));
    SchemaDefinition::new(variant, version, fields)
}

// ---------------------------------------------------------------------------
// Drillholes and tables
// ---------------------------------------------------------------------------

fn downhole_collection() -> SchemaDefinition {
    SchemaDefinition::new(
        DownholeCollection,
        "1.2.1",
        vec![
            FieldSpec::required(
                "collars",
                ValueKind::Nested {
                    fields: vec![
                        FieldSpec::required("coordinates", ValueKind::PointArray),
                        FieldSpec::required("hole_ids", ValueKind::TextArray).with(
                            LengthMatches {
                                sibling: "coordinates",
                            },
                        ),
                    ],
                },
            ),
            FieldSpec::required(
                "surveys",
                ValueKind::NestedList {
                    fields: vec![
                        FieldSpec::required("hole", ValueKind::Count),
                        FieldSpec::required("depths", ValueKind::ScalarArray),
                        FieldSpec::required("azimuths", ValueKind::ScalarArray)
                            .with(LengthMatches { sibling: "depths" }),
                        FieldSpec::required("dips", ValueKind::ScalarArray)
                            .with(LengthMatches { sibling: "depths" }),
                    ],
                },
            )
            .with(ElementIndicesWithin {
                field: "hole",
                target: "collars.coordinates",
            }),
        ],
    )
}

fn downhole_intervals() -> SchemaDefinition {
    SchemaDefinition::new(
        DownholeIntervals,
        "1.1.0",
        vec![
            FieldSpec::required("start", ValueKind::ScalarArray),
            FieldSpec::required("end", ValueKind::ScalarArray)
                .with(LengthMatches { sibling: "start" }),
            FieldSpec::optional("hole_ids", ValueKind::TextArray)
                .with(LengthMatches { sibling: "start" }),
            attribute_list("attributes").with(ElementLengthMatches {
                field: "values",
                sibling: "start",
            }),
        ],
    )
}

fn blasthole_collection() -> SchemaDefinition {
    SchemaDefinition::new(
        BlastholeCollection,
        "1.0.0",
        vec![
            FieldSpec::required(
                "collars",
                ValueKind::Nested {
                    fields: vec![
                        FieldSpec::required("coordinates", ValueKind::PointArray),
                        FieldSpec::required("hole_ids", ValueKind::TextArray).with(
                            LengthMatches {
                                sibling: "coordinates",
                            },
                        ),
                    ],
                },
            ),
            FieldSpec::required("depths", ValueKind::ScalarArray).with(LengthMatches {
                sibling: "collars.coordinates",
            }),
            attribute_list("attributes").with(ElementLengthMatches {
                field: "values",
                sibling: "collars.coordinates",
            }),
        ],
    )
}

fn attribute_table() -> SchemaDefinition {
    SchemaDefinition::new(
        AttributeTable,
        "1.0.2",
        vec![FieldSpec::required(
            "columns",
            ValueKind::NestedList {
                fields: vec![
                    FieldSpec::required("name", ValueKind::Text),
                    FieldSpec::required("values", ValueKind::ScalarArray),
                ],
            },
        )
        .with(UniformElementLength { field: "values" })],
    )
}

// ---------------------------------------------------------------------------
// Geostatistics
// ---------------------------------------------------------------------------

fn variogram() -> SchemaDefinition {
    SchemaDefinition::new(
        Variogram,
        "1.1.0",
        vec![
            FieldSpec::required("nugget", ValueKind::Scalar),
            FieldSpec::required("number_of_structures", ValueKind::Count).with(
                CountMatchesLength {
                    sibling: "structures",
                },
            ),
            FieldSpec::required(
                "structures",
                ValueKind::NestedList {
                    fields: vec![
                        FieldSpec::required("model", ValueKind::Text),
                        FieldSpec::required("variance", ValueKind::Scalar),
                        FieldSpec::required("ranges", ValueKind::FloatTriple),
                        FieldSpec::required("rotation", ValueKind::FloatTriple),
                    ],
                },
            ),
        ],
    )
}

fn global_ellipsoid() -> SchemaDefinition {
    SchemaDefinition::new(
        GlobalEllipsoid,
        "1.0.1",
        vec![
            FieldSpec::required("ranges", ValueKind::FloatTriple),
            FieldSpec::required("rotation", ValueKind::FloatTriple),
        ],
    )
}

fn local_ellipsoids() -> SchemaDefinition {
    SchemaDefinition::new(
        LocalEllipsoids,
        "1.0.1",
        vec![
            bare_locations(),
            FieldSpec::required("ranges", ValueKind::TripleArray).with(LengthMatches {
                sibling: "locations.coordinates",
            }),
            FieldSpec::required("rotations", ValueKind::TripleArray).with(LengthMatches {
                sibling: "locations.coordinates",
            }),
        ],
    )
}

fn continuous_distribution() -> SchemaDefinition {
    SchemaDefinition::new(
        ContinuousDistribution,
        "1.0.0",
        vec![
            FieldSpec::required("quantiles", ValueKind::ScalarArray),
            FieldSpec::required("values", ValueKind::ScalarArray).with(LengthMatches {
                sibling: "quantiles",
            }),
        ],
    )
}

// ---------------------------------------------------------------------------
// Surveys and field records
// ---------------------------------------------------------------------------

fn survey(
    variant: ObjectVariant,
    version: &'static str,
    extras: Vec<FieldSpec>,
) -> SchemaDefinition {
    let mut fields = vec![survey_lines()];
    fields.extend(extras);
    SchemaDefinition::new(variant, version, fields)
}

fn structural_data() -> SchemaDefinition {
    SchemaDefinition::new(
        StructuralData,
        "1.0.0",
        vec![
            bare_locations(),
            FieldSpec::required("dip", ValueKind::ScalarArray).with(LengthMatches {
                sibling: "locations.coordinates",
            }),
            FieldSpec::required("dip_azimuth", ValueKind::ScalarArray).with(LengthMatches {
                sibling: "locations.coordinates",
            }),
            FieldSpec::optional("polarity", ValueKind::CountArray).with(LengthMatches {
                sibling: "locations.coordinates",
            }),
        ],
    )
}

fn geophysical_records_1d() -> SchemaDefinition {
    SchemaDefinition::new(
        GeophysicalRecords1d,
        "1.0.0",
        vec![FieldSpec::required(
            "records",
            ValueKind::NestedList {
                fields: vec![
                    FieldSpec::required("collar", ValueKind::Point),
                    FieldSpec::required("depths", ValueKind::ScalarArray),
                    FieldSpec::required("values", ValueKind::ScalarArray)
                        .with(LengthMatches { sibling: "depths" }),
                ],
            },
        )],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_variant_once() {
        let defs = catalog();
        assert_eq!(defs.len(), ObjectVariant::ALL.len());
        for (def, variant) in defs.iter().zip(ObjectVariant::ALL) {
            assert_eq!(def.variant, variant, "catalogue order drifted");
        }
    }

    #[test]
    fn test_versions_are_populated() {
        for def in catalog() {
            assert!(!def.version.is_empty(), "{} has no version", def.variant);
            assert!(def.version.split('.').count() == 3);
        }
    }

    #[test]
    fn test_every_definition_has_fields() {
        for def in catalog() {
            assert!(!def.fields.is_empty(), "{} has no fields", def.variant);
        }
    }

    #[test]
    fn test_invariant_operands_resolve() {
        // Every sibling/size/target operand must name a real field in the
        // scope it is evaluated in; a typo here is a configuration defect.
        for def in catalog() {
            check_scope(&def, &def.fields);
        }
    }

    fn check_scope(def: &SchemaDefinition, fields: &[FieldSpec]) {
        use super::super::types::resolve_in;
        for spec in fields {
            for rule in &spec.invariants {
                let operands: Vec<&str> = match rule {
                    LengthMatches { sibling }
                    | CountMatchesLength { sibling }
                    | ElementLengthMatches { sibling, .. } => vec![*sibling],
                    LengthEqualsCellCount { size }
                    | ElementLengthEqualsCellCount { size, .. }
                    | ElementLengthEqualsCornerCount { size, .. } => vec![*size],
                    ActiveCountMatches { count } | ElementLengthEqualsCount { count, .. } => {
                        vec![*count]
                    }
                    IndicesWithin { target } | ElementIndicesWithin { target, .. } => {
                        vec![*target]
                    }
                    ElementLengthEqualsAxisProduct { axes, .. } => axes.to_vec(),
                    UniformChannels { .. } | UniformElementLength { .. } => vec![],
                };
                for operand in operands {
                    assert!(
                        resolve_in(fields, operand).is_some(),
                        "{}: rule operand '{}' does not resolve",
                        def.variant,
                        operand
                    );
                }
            }
            match &spec.kind {
                ValueKind::Nested { fields } | ValueKind::NestedList { fields } => {
                    check_scope(def, fields)
                }
                _ => {}
            }
        }
    }
}
