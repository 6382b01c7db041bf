//! Schema type definitions per CATALOG.md
//!
//! A schema definition is an ordered tree of field specs. Declaration
//! order is significant: the validator walks fields in the order they are
//! declared here, so violation ordering is stable across runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of catalogued object variants.
///
/// The tag determines which schema definition governs validation and is
/// immutable once an object has been constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectVariant {
    #[serde(rename = "pointset")]
    Pointset,
    #[serde(rename = "line-segments")]
    LineSegments,
    #[serde(rename = "triangle-mesh")]
    TriangleMesh,
    #[serde(rename = "geological-model-meshes")]
    GeologicalModelMeshes,
    #[serde(rename = "regular-2d-grid")]
    Regular2dGrid,
    #[serde(rename = "tensor-2d-grid")]
    Tensor2dGrid,
    #[serde(rename = "regular-3d-grid")]
    Regular3dGrid,
    #[serde(rename = "regular-masked-3d-grid")]
    RegularMasked3dGrid,
    #[serde(rename = "tensor-3d-grid")]
    Tensor3dGrid,
    #[serde(rename = "unstructured-grid")]
    UnstructuredGrid,
    #[serde(rename = "unstructured-tet-grid")]
    UnstructuredTetGrid,
    #[serde(rename = "unstructured-hex-grid")]
    UnstructuredHexGrid,
    #[serde(rename = "unstructured-quad-grid")]
    UnstructuredQuadGrid,
    #[serde(rename = "downhole-collection")]
    DownholeCollection,
    #[serde(rename = "downhole-intervals")]
    DownholeIntervals,
    #[serde(rename = "blasthole-collection")]
    BlastholeCollection,
    #[serde(rename = "attribute-table")]
    AttributeTable,
    #[serde(rename = "variogram")]
    Variogram,
    #[serde(rename = "global-ellipsoid")]
    GlobalEllipsoid,
    #[serde(rename = "local-ellipsoids")]
    LocalEllipsoids,
    #[serde(rename = "continuous-distribution")]
    ContinuousDistribution,
    #[serde(rename = "airborne-magnetic-survey")]
    AirborneMagneticSurvey,
    #[serde(rename = "airborne-radiometric-survey")]
    AirborneRadiometricSurvey,
    #[serde(rename = "airborne-em-survey")]
    AirborneEmSurvey,
    #[serde(rename = "ground-magnetic-survey")]
    GroundMagneticSurvey,
    #[serde(rename = "ground-gravity-survey")]
    GroundGravitySurvey,
    #[serde(rename = "dcip-survey")]
    DcipSurvey,
    #[serde(rename = "structural-data")]
    StructuralData,
    #[serde(rename = "geophysical-records-1d")]
    GeophysicalRecords1d,
}

impl ObjectVariant {
    /// Every catalogued variant, in catalogue order.
    pub const ALL: [ObjectVariant; 29] = [
        ObjectVariant::Pointset,
        ObjectVariant::LineSegments,
        ObjectVariant::TriangleMesh,
        ObjectVariant::GeologicalModelMeshes,
        ObjectVariant::Regular2dGrid,
        ObjectVariant::Tensor2dGrid,
        ObjectVariant::Regular3dGrid,
        ObjectVariant::RegularMasked3dGrid,
        ObjectVariant::Tensor3dGrid,
        ObjectVariant::UnstructuredGrid,
        ObjectVariant::UnstructuredTetGrid,
        ObjectVariant::UnstructuredHexGrid,
        ObjectVariant::UnstructuredQuadGrid,
        ObjectVariant::DownholeCollection,
        ObjectVariant::DownholeIntervals,
        ObjectVariant::BlastholeCollection,
        ObjectVariant::AttributeTable,
        ObjectVariant::Variogram,
        ObjectVariant::GlobalEllipsoid,
        ObjectVariant::LocalEllipsoids,
        ObjectVariant::ContinuousDistribution,
        ObjectVariant::AirborneMagneticSurvey,
        ObjectVariant::AirborneRadiometricSurvey,
        ObjectVariant::AirborneEmSurvey,
        ObjectVariant::GroundMagneticSurvey,
        ObjectVariant::GroundGravitySurvey,
        ObjectVariant::DcipSurvey,
        ObjectVariant::StructuralData,
        ObjectVariant::GeophysicalRecords1d,
    ];

    /// Returns the kebab-case tag for this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            ObjectVariant::Pointset => "pointset",
            ObjectVariant::LineSegments => "line-segments",
            ObjectVariant::TriangleMesh => "triangle-mesh",
            ObjectVariant::GeologicalModelMeshes => "geological-model-meshes",
            ObjectVariant::Regular2dGrid => "regular-2d-grid",
            ObjectVariant::Tensor2dGrid => "tensor-2d-grid",
            ObjectVariant::Regular3dGrid => "regular-3d-grid",
            ObjectVariant::RegularMasked3dGrid => "regular-masked-3d-grid",
            ObjectVariant::Tensor3dGrid => "tensor-3d-grid",
            ObjectVariant::UnstructuredGrid => "unstructured-grid",
            ObjectVariant::UnstructuredTetGrid => "unstructured-tet-grid",
            ObjectVariant::UnstructuredHexGrid => "unstructured-hex-grid",
            ObjectVariant::UnstructuredQuadGrid => "unstructured-quad-grid",
            ObjectVariant::DownholeCollection => "downhole-collection",
            ObjectVariant::DownholeIntervals => "downhole-intervals",
            ObjectVariant::BlastholeCollection => "blasthole-collection",
            ObjectVariant::AttributeTable => "attribute-table",
            ObjectVariant::Variogram => "variogram",
            ObjectVariant::GlobalEllipsoid => "global-ellipsoid",
            ObjectVariant::LocalEllipsoids => "local-ellipsoids",
            ObjectVariant::ContinuousDistribution => "continuous-distribution",
            ObjectVariant::AirborneMagneticSurvey => "airborne-magnetic-survey",
            ObjectVariant::AirborneRadiometricSurvey => "airborne-radiometric-survey",
            ObjectVariant::AirborneEmSurvey => "airborne-em-survey",
            ObjectVariant::GroundMagneticSurvey => "ground-magnetic-survey",
            ObjectVariant::GroundGravitySurvey => "ground-gravity-survey",
            ObjectVariant::DcipSurvey => "dcip-survey",
            ObjectVariant::StructuralData => "structural-data",
            ObjectVariant::GeophysicalRecords1d => "geophysical-records-1d",
        }
    }

    /// Parses a kebab-case tag.
    pub fn from_tag(tag: &str) -> Option<ObjectVariant> {
        ObjectVariant::ALL.iter().copied().find(|v| v.tag() == tag)
    }
}

impl fmt::Display for ObjectVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// The value kind a field holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// 64-bit float
    Scalar,
    /// Non-negative integer
    Count,
    /// UTF-8 string
    Text,
    /// Spatial (x, y, z) coordinate
    Point,
    /// Two floats (2d cell sizes)
    FloatPair,
    /// Three non-spatial floats (ranges, rotations)
    FloatTriple,
    /// Sequence of floats
    ScalarArray,
    /// Sequence of non-negative integers
    CountArray,
    /// Sequence of strings
    TextArray,
    /// Boolean mask
    BoolArray,
    /// Sequence of spatial (x, y, z) coordinates
    PointArray,
    /// Sequence of non-spatial float triples
    TripleArray,
    /// Sequence of fixed-arity index tuples
    IndexArray { arity: usize },
    /// Per-axis cell counts, exactly `dims` entries
    SizeArray { dims: usize },
    /// Nested record with its own field specs
    Nested { fields: Vec<FieldSpec> },
    /// Sequence of nested records
    NestedList { fields: Vec<FieldSpec> },
}

impl ValueKind {
    /// Returns the kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueKind::Scalar => "number",
            ValueKind::Count => "non-negative integer",
            ValueKind::Text => "string",
            ValueKind::Point => "coordinate triple",
            ValueKind::FloatPair => "float pair",
            ValueKind::FloatTriple => "float triple",
            ValueKind::ScalarArray => "number array",
            ValueKind::CountArray => "non-negative integer array",
            ValueKind::TextArray => "string array",
            ValueKind::BoolArray => "bool array",
            ValueKind::PointArray => "coordinate array",
            ValueKind::TripleArray => "float triple array",
            ValueKind::IndexArray { .. } => "index tuple array",
            ValueKind::SizeArray { .. } => "size array",
            ValueKind::Nested { .. } => "nested record",
            ValueKind::NestedList { .. } => "record list",
        }
    }

    /// Returns true for kinds assembled one element per input row.
    pub fn is_row_streamed(&self) -> bool {
        matches!(
            self,
            ValueKind::ScalarArray
                | ValueKind::CountArray
                | ValueKind::TextArray
                | ValueKind::BoolArray
                | ValueKind::PointArray
                | ValueKind::TripleArray
                | ValueKind::IndexArray { .. }
        )
    }
}

/// A cross-field consistency rule attached to a field spec.
///
/// Sibling operands are dotted paths resolved in the scope that declares
/// the field; `field` operands are resolved inside each element of a
/// record list.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantRule {
    /// len(self) == len(sibling array)
    LengthMatches { sibling: &'static str },
    /// integer value of self == len(sibling array)
    CountMatchesLength { sibling: &'static str },
    /// len(self) == product of the size array's entries
    LengthEqualsCellCount { size: &'static str },
    /// number of true entries of self == integer value of sibling
    ActiveCountMatches { count: &'static str },
    /// every index in self < len(target array)
    IndicesWithin { target: &'static str },
    /// for each element of self: len(element.field) == len(sibling array)
    ElementLengthMatches {
        field: &'static str,
        sibling: &'static str,
    },
    /// for each element of self: len(element.field) == product of size entries
    ElementLengthEqualsCellCount {
        field: &'static str,
        size: &'static str,
    },
    /// for each element of self: len(element.field) == product of (size entries + 1)
    ElementLengthEqualsCornerCount {
        field: &'static str,
        size: &'static str,
    },
    /// for each element of self: len(element.field) == product of sibling array lengths
    ElementLengthEqualsAxisProduct {
        field: &'static str,
        axes: &'static [&'static str],
    },
    /// for each element of self: len(element.field) == integer value of sibling
    ElementLengthEqualsCount {
        field: &'static str,
        count: &'static str,
    },
    /// for each element of self: every index in element.field < len(target array)
    ElementIndicesWithin {
        field: &'static str,
        target: &'static str,
    },
    /// across elements of self: the ordered element.list[*].name sequence is identical
    UniformChannels {
        list: &'static str,
        name: &'static str,
    },
    /// across elements of self: len(element.field) is identical
    UniformElementLength { field: &'static str },
}

impl InvariantRule {
    /// Human description of the predicate, used in violation details.
    pub fn describe(&self) -> String {
        match self {
            InvariantRule::LengthMatches { sibling } => {
                format!("length must match length of '{}'", sibling)
            }
            InvariantRule::CountMatchesLength { sibling } => {
                format!("count must match length of '{}'", sibling)
            }
            InvariantRule::LengthEqualsCellCount { size } => {
                format!("length must equal the cell count declared by '{}'", size)
            }
            InvariantRule::ActiveCountMatches { count } => {
                format!("number of active entries must equal '{}'", count)
            }
            InvariantRule::IndicesWithin { target } => {
                format!("indices must resolve within '{}'", target)
            }
            InvariantRule::ElementLengthMatches { field, sibling } => {
                format!("each '{}' length must match length of '{}'", field, sibling)
            }
            InvariantRule::ElementLengthEqualsCellCount { field, size } => format!(
                "each '{}' length must equal the cell count declared by '{}'",
                field, size
            ),
            InvariantRule::ElementLengthEqualsCornerCount { field, size } => format!(
                "each '{}' length must equal the corner count declared by '{}'",
                field, size
            ),
            InvariantRule::ElementLengthEqualsAxisProduct { field, axes } => format!(
                "each '{}' length must equal the product of lengths of {}",
                field,
                axes.join(", ")
            ),
            InvariantRule::ElementLengthEqualsCount { field, count } => {
                format!("each '{}' length must equal '{}'", field, count)
            }
            InvariantRule::ElementIndicesWithin { field, target } => {
                format!("each '{}' must resolve within '{}'", field, target)
            }
            InvariantRule::UniformChannels { list, .. } => {
                format!("'{}' definitions must be uniform across elements", list)
            }
            InvariantRule::UniformElementLength { field } => {
                format!("every '{}' must have the same length", field)
            }
        }
    }
}

/// A single node of a schema definition's field tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name as it appears in the object body
    pub name: &'static str,
    /// Whether the field must be populated
    pub required: bool,
    /// Value kind
    pub kind: ValueKind,
    /// Invariant predicates relating this field to its siblings
    pub invariants: Vec<InvariantRule>,
}

impl FieldSpec {
    /// Create a required field
    pub fn required(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            required: true,
            kind,
            invariants: Vec::new(),
        }
    }

    /// Create an optional field
    pub fn optional(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            required: false,
            kind,
            invariants: Vec::new(),
        }
    }

    /// Attach an invariant rule
    pub fn with(mut self, rule: InvariantRule) -> Self {
        self.invariants.push(rule);
        self
    }
}

/// Complete schema definition for one object variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    /// Variant tag governed by this definition
    pub variant: ObjectVariant,
    /// Published schema version identifier
    pub version: &'static str,
    /// Ordered field tree
    pub fields: Vec<FieldSpec>,
}

impl SchemaDefinition {
    pub fn new(variant: ObjectVariant, version: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self {
            variant,
            version,
            fields,
        }
    }

    /// Resolves a dotted path ("locations.coordinates", "lines.channels")
    /// to a field spec, descending through nested records and record lists.
    pub fn resolve(&self, path: &str) -> Option<&FieldSpec> {
        resolve_in(&self.fields, path)
    }
}

/// Resolves a dotted path within an ordered field list.
pub fn resolve_in<'a>(fields: &'a [FieldSpec], path: &str) -> Option<&'a FieldSpec> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let spec = fields.iter().find(|f| f.name == head)?;
    match rest {
        None => Some(spec),
        Some(rest) => match &spec.kind {
            ValueKind::Nested { fields } | ValueKind::NestedList { fields } => {
                resolve_in(fields, rest)
            }
            _ => None,
        },
    }
}
