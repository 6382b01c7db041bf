//! The constructed geoscience object and its base properties.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::adapter::Crs;
use crate::schema::ObjectVariant;

/// Variant-specific field tree of an object, keyed by field name.
pub type Body = serde_json::Map<String, Value>;

/// Axis-aligned bounding box in three dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// A degenerate box around a single point.
    pub fn at(point: [f64; 3]) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grows the box to include `point`.
    pub fn include(&mut self, point: [f64; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(point[axis]);
            self.max[axis] = self.max[axis].max(point[axis]);
        }
    }

    /// Componentwise min/max over a point sequence. None for an empty
    /// sequence; an empty geometry has no extent, not a zero extent.
    pub fn from_points(points: impl IntoIterator<Item = [f64; 3]>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = BoundingBox::at(points.next()?);
        for point in points {
            bounds.include(point);
        }
        Some(bounds)
    }
}

/// Schema tag stamped onto a constructed object: the governing variant
/// plus the catalogue version used for construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaTag {
    pub variant: ObjectVariant,
    pub version: String,
}

impl SchemaTag {
    pub fn new(variant: ObjectVariant, version: impl Into<String>) -> Self {
        Self {
            variant,
            version: version.into(),
        }
    }

    /// The kebab-case variant tag.
    pub fn tag(&self) -> &'static str {
        self.variant.tag()
    }
}

impl std::fmt::Display for SchemaTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "objects/{}/{}", self.variant.tag(), self.version)
    }
}

/// Provenance record carried by imported objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineage {
    /// Where the input came from, e.g. an upstream file name
    pub source: String,
    /// When the input was captured
    pub imported_at: DateTime<Utc>,
}

/// A constructed, validated geoscience object.
///
/// Owned exclusively by the caller that requested its construction; the
/// engine keeps no reference after returning it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoscienceObject {
    /// Object name
    pub name: String,
    /// Freshly generated identifier
    pub uuid: Uuid,
    /// Governing variant and catalogue version
    pub schema: SchemaTag,
    /// Coordinate reference system descriptor
    pub coordinate_reference_system: Crs,
    /// Derived spatial extent; absent when the object carries no
    /// coordinate data and no reference geometry was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Optional free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional key/value tags
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    /// Optional extension payloads, opaque to the engine
    #[serde(skip_serializing_if = "Body::is_empty")]
    pub extensions: Body,
    /// Optional provenance record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineage: Option<Lineage>,
    /// Variant-specific field tree
    #[serde(flatten)]
    pub body: Body,
}

impl GeoscienceObject {
    /// Full JSON content form of the object (base properties plus the
    /// flattened variant body).
    pub fn to_content(&self) -> Value {
        serde_json::to_value(self).expect("object serialization is infallible")
    }

    /// Collects every data blob reference held under a `data` key
    /// anywhere in the variant body, in traversal order.
    pub fn data_references(&self) -> Vec<String> {
        let mut references = Vec::new();
        for value in self.body.values() {
            collect_data_references(value, &mut references);
        }
        references
    }
}

fn collect_data_references(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                match (key.as_str(), value) {
                    ("data", Value::String(reference)) => out.push(reference.clone()),
                    _ => collect_data_references(value, out),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_data_references(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_object(body: Body) -> GeoscienceObject {
        GeoscienceObject {
            name: "sample".into(),
            uuid: Uuid::new_v4(),
            schema: SchemaTag::new(ObjectVariant::Pointset, "1.2.0"),
            coordinate_reference_system: Crs::new("EPSG:4326", "WGS 84"),
            bounding_box: None,
            description: None,
            tags: BTreeMap::new(),
            extensions: Body::new(),
            lineage: None,
            body,
        }
    }

    #[test]
    fn test_bounding_box_componentwise() {
        let bounds = BoundingBox::from_points([
            [0.0, 0.0, 0.0],
            [1.0, 2.0, 3.0],
            [-1.0, 0.0, 5.0],
        ])
        .unwrap();
        assert_eq!(bounds.min, [-1.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_empty_point_sequence_has_no_box() {
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_schema_tag_path_form() {
        let tag = SchemaTag::new(ObjectVariant::TriangleMesh, "2.1.0");
        assert_eq!(tag.to_string(), "objects/triangle-mesh/2.1.0");
    }

    #[test]
    fn test_body_flattens_into_content() {
        let mut body = Body::new();
        body.insert("locations".into(), json!({"coordinates": [[0, 0, 0]]}));
        let object = sample_object(body);
        let content = object.to_content();
        assert_eq!(content["name"], "sample");
        assert_eq!(content["locations"]["coordinates"][0][0], 0);
        // Absent optional base properties are omitted, not nulled.
        assert!(content.get("description").is_none());
    }

    #[test]
    fn test_data_references_walk() {
        let mut body = Body::new();
        body.insert(
            "locations".into(),
            json!({
                "coordinates": {"data": "blob-1", "length": 3},
                "attributes": [
                    {"name": "grade", "values": {"data": "blob-2"}},
                    {"name": "note", "values": [1, 2, 3]}
                ]
            }),
        );
        let object = sample_object(body);
        assert_eq!(object.data_references(), vec!["blob-1", "blob-2"]);
    }
}
