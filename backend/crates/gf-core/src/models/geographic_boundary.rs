use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Raw GeoJSON geometry as read from the boundary source.
///
/// Kept untyped so that unsupported geometry kinds surface as
/// `InvalidGeometry` when the predicate is built, not while loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Value,
}

/// A named polygon or multipolygon used as a spatial filter.
#[derive(Debug, Clone, PartialEq)]
pub struct GeographicBoundary {
    pub id: String,
    pub name: String,
    pub admin_level: Option<i32>,
    pub geometry: BoundaryGeometry,
}

impl GeographicBoundary {
    pub fn new(id: impl Into<String>, name: impl Into<String>, geometry: BoundaryGeometry) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            admin_level: None,
            geometry,
        }
    }

    /// Polygon from rings of `(lon, lat)` vertices, exterior ring first.
    pub fn polygon(
        id: impl Into<String>,
        name: impl Into<String>,
        rings: Vec<Vec<(f64, f64)>>,
    ) -> Self {
        Self::new(
            id,
            name,
            BoundaryGeometry {
                kind: String::from("Polygon"),
                coordinates: rings_to_json(&rings),
            },
        )
    }

    pub fn multi_polygon(
        id: impl Into<String>,
        name: impl Into<String>,
        polygons: Vec<Vec<Vec<(f64, f64)>>>,
    ) -> Self {
        let coordinates = Value::Array(polygons.iter().map(|p| rings_to_json(p)).collect());

        Self::new(
            id,
            name,
            BoundaryGeometry {
                kind: String::from("MultiPolygon"),
                coordinates,
            },
        )
    }
}

fn rings_to_json(rings: &[Vec<(f64, f64)>]) -> Value {
    Value::Array(
        rings
            .iter()
            .map(|ring| {
                Value::Array(ring.iter().map(|(lon, lat)| json!([lon, lat])).collect())
            })
            .collect(),
    )
}
