use crate::{BoundaryGeometry, CoreError, GeographicBoundary, Result};

use std::collections::BTreeMap;

use log::{info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    geometry: Option<BoundaryGeometry>,
    #[serde(default)]
    properties: Map<String, Value>,
}

/// Read-only set of named boundaries, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCatalog {
    boundaries: BTreeMap<String, GeographicBoundary>,
}

impl BoundaryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_boundaries(boundaries: impl IntoIterator<Item = GeographicBoundary>) -> Self {
        let mut catalog = Self::new();
        for boundary in boundaries {
            catalog.insert(boundary);
        }
        catalog
    }

    /// Parse a GeoJSON FeatureCollection.
    ///
    /// The boundary id is the `osm_id` property when present, else the feature
    /// `id`. Display name and admin level come from the `name` and
    /// `admin_level` properties. Features with no id or no geometry are skipped.
    #[track_caller]
    pub fn from_geojson(json: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(json)?;
        let mut catalog = Self::new();

        for (index, feature) in collection.features.into_iter().enumerate() {
            let Some(id) = feature
                .properties
                .get("osm_id")
                .and_then(value_to_id)
                .or_else(|| feature.id.as_ref().and_then(value_to_id))
            else {
                warn!("Skipping boundary feature {index}: no osm_id or feature id");
                continue;
            };

            let Some(geometry) = feature.geometry else {
                warn!("Skipping boundary feature {id}: no geometry");
                continue;
            };

            let name = feature
                .properties
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            let admin_level = feature.properties.get("admin_level").and_then(|v| match v {
                Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
                Value::String(s) => s.parse().ok(),
                _ => None,
            });

            catalog.insert(GeographicBoundary {
                id,
                name,
                admin_level,
                geometry,
            });
        }

        info!("Loaded {} boundaries", catalog.len());

        Ok(catalog)
    }

    pub fn insert(&mut self, boundary: GeographicBoundary) {
        if let Some(previous) = self.boundaries.insert(boundary.id.clone(), boundary) {
            warn!("Duplicate boundary id {}, keeping the last one", previous.id);
        }
    }

    #[track_caller]
    pub fn get(&self, boundary_id: &str) -> Result<&GeographicBoundary> {
        self.boundaries
            .get(boundary_id)
            .ok_or_else(|| CoreError::boundary_not_found(boundary_id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.boundaries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
