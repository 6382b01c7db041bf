//! Catalogue and Registry Invariant Tests
//!
//! - The embedded table covers exactly the 29 catalogued variants
//! - Bootstrap is single-writer and fail-fast on duplicates
//! - Lookups after bootstrap are pure reads
//! - Unknown tags are rejected, never guessed at

use geoforge::schema::{catalog, ObjectVariant, SchemaRegistry, ValueKind};

// =============================================================================
// Bootstrap Tests
// =============================================================================

/// The registry covers the full catalogue after bootstrap.
#[test]
fn test_bootstrap_covers_all_29_variants() {
    let registry = SchemaRegistry::bootstrap().unwrap();
    assert_eq!(registry.len(), 29);

    for variant in ObjectVariant::ALL {
        let definition = registry.lookup(variant).unwrap();
        assert_eq!(definition.variant, variant);
        assert!(!definition.fields.is_empty());
    }
}

/// Registering a variant twice is a fatal configuration error.
#[test]
fn test_duplicate_registration_is_fatal() {
    let mut registry = SchemaRegistry::empty();
    let mut defs = catalog().into_iter();
    let first = defs.next().unwrap();

    registry.register(first.clone()).unwrap();
    let err = registry.register(first).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(err.code().code(), "GEO_DUPLICATE_VARIANT");
}

/// Bootstrap succeeds repeatedly; registries are independent values.
#[test]
fn test_bootstrap_is_repeatable() {
    let a = SchemaRegistry::bootstrap().unwrap();
    let b = SchemaRegistry::bootstrap().unwrap();
    let tags_a: Vec<_> = a.variants().collect();
    let tags_b: Vec<_> = b.variants().collect();
    assert_eq!(tags_a, tags_b);
}

// =============================================================================
// Lookup Tests
// =============================================================================

/// Every published tag resolves to its definition.
#[test]
fn test_lookup_by_tag() {
    let registry = SchemaRegistry::bootstrap().unwrap();

    for tag in ["pointset", "triangle-mesh", "regular-masked-3d-grid", "dcip-survey"] {
        let definition = registry.lookup_tag(tag).unwrap();
        assert_eq!(definition.variant.tag(), tag);
    }
}

/// An unknown tag is rejected with GEO_UNKNOWN_VARIANT.
#[test]
fn test_unknown_tag_rejected() {
    let registry = SchemaRegistry::bootstrap().unwrap();
    let err = registry.lookup_tag("not-a-real-schema").unwrap_err();
    assert_eq!(err.code().code(), "GEO_UNKNOWN_VARIANT");
    assert_eq!(err.variant(), Some("not-a-real-schema"));
    assert!(!err.is_fatal());
}

// =============================================================================
// Catalogue Shape Tests
// =============================================================================

/// Versions are three-part and definitions carry ordered field trees.
#[test]
fn test_definitions_carry_versions() {
    for definition in catalog() {
        assert_eq!(
            definition.version.split('.').count(),
            3,
            "{} version '{}' is not three-part",
            definition.variant,
            definition.version
        );
    }
}

/// The masked grid entry declares the mask/count consistency pair.
#[test]
fn test_masked_grid_declares_mask_and_count() {
    let registry = SchemaRegistry::bootstrap().unwrap();
    let definition = registry
        .lookup(ObjectVariant::RegularMasked3dGrid)
        .unwrap();

    let mask = definition.resolve("mask").unwrap();
    assert!(mask.required);
    assert_eq!(mask.kind, ValueKind::BoolArray);
    assert_eq!(mask.invariants.len(), 2);

    let count = definition.resolve("number_of_active_cells").unwrap();
    assert!(count.required);
    assert_eq!(count.kind, ValueKind::Count);
}

/// All six survey variants share the uniform-channel line list shape.
#[test]
fn test_survey_variants_share_line_list() {
    let registry = SchemaRegistry::bootstrap().unwrap();
    for variant in [
        ObjectVariant::AirborneMagneticSurvey,
        ObjectVariant::AirborneRadiometricSurvey,
        ObjectVariant::AirborneEmSurvey,
        ObjectVariant::GroundMagneticSurvey,
        ObjectVariant::GroundGravitySurvey,
        ObjectVariant::DcipSurvey,
    ] {
        let definition = registry.lookup(variant).unwrap();
        let lines = definition.resolve("lines").unwrap();
        assert!(lines.required, "{} lines must be required", variant);
        assert!(
            !lines.invariants.is_empty(),
            "{} lines must carry the uniformity rule",
            variant
        );
        assert!(definition.resolve("lines.channels").is_some());
    }
}
