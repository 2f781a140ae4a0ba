use crate::geometry::containment_predicate::{GeometryKind, Polygon};
use crate::{BoundingBox, ContainmentPredicate, CoreError, GeographicBoundary, Position, Result};

use std::collections::HashSet;

use serde_json::Value;

const MIN_DISTINCT_VERTICES: usize = 3;

type RawRing = Vec<Vec<f64>>;
type RawPolygon = Vec<RawRing>;

/// Convert a boundary into its containment predicate.
///
/// Accepts `Polygon` and `MultiPolygon` geometries whose rings are lists of
/// `[lon, lat]` positions, exterior ring first. A repeated closing vertex is
/// tolerated but not required. Extra position members (altitude) are ignored.
pub fn to_containment_predicate(boundary: &GeographicBoundary) -> Result<ContainmentPredicate> {
    let id = boundary.id.as_str();
    let coordinates = &boundary.geometry.coordinates;

    let (kind, raw_polygons) = match boundary.geometry.kind.as_str() {
        "Polygon" => (GeometryKind::Polygon, vec![decode::<RawPolygon>(id, coordinates)?]),
        "MultiPolygon" => (
            GeometryKind::MultiPolygon,
            decode::<Vec<RawPolygon>>(id, coordinates)?,
        ),
        other => {
            return Err(CoreError::invalid_geometry(
                id,
                format!("unsupported geometry type '{other}'"),
            ));
        }
    };

    if raw_polygons.is_empty() {
        return Err(CoreError::invalid_geometry(id, "multipolygon has no polygons"));
    }

    let polygons = raw_polygons
        .iter()
        .map(|raw| build_polygon(id, raw))
        .collect::<Result<Vec<_>>>()?;

    let mut bbox = BoundingBox::from_positions(&polygons[0].exterior)
        .ok_or_else(|| CoreError::invalid_geometry(id, "empty exterior ring"))?;
    for polygon in &polygons[1..] {
        if let Some(other) = BoundingBox::from_positions(&polygon.exterior) {
            bbox.merge(&other);
        }
    }

    Ok(ContainmentPredicate::new(
        boundary.id.clone(),
        kind,
        polygons,
        bbox,
    ))
}

fn decode<T: serde::de::DeserializeOwned>(boundary_id: &str, coordinates: &Value) -> Result<T> {
    serde_json::from_value(coordinates.clone()).map_err(|e| {
        CoreError::invalid_geometry(boundary_id, format!("malformed coordinates: {e}"))
    })
}

fn build_polygon(boundary_id: &str, raw: &RawPolygon) -> Result<Polygon> {
    let mut rings = raw
        .iter()
        .enumerate()
        .map(|(index, ring)| build_ring(boundary_id, index, ring));

    let exterior = rings
        .next()
        .ok_or_else(|| CoreError::invalid_geometry(boundary_id, "polygon has no rings"))??;
    let holes = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon { exterior, holes })
}

fn build_ring(boundary_id: &str, index: usize, raw: &RawRing) -> Result<Vec<Position>> {
    let mut ring = Vec::with_capacity(raw.len());

    for member in raw {
        if member.len() < 2 {
            return Err(CoreError::invalid_geometry(
                boundary_id,
                format!("ring {index} has a position with fewer than 2 members"),
            ));
        }

        let position = Position::new(member[0], member[1]);
        if !position.is_valid() {
            return Err(CoreError::invalid_geometry(
                boundary_id,
                format!("ring {index} has coordinate ({position}) outside [-180,180]x[-90,90]"),
            ));
        }
        ring.push(position);
    }

    if ring.len() > 1 && ring.first().map(Position::key) == ring.last().map(Position::key) {
        ring.pop();
    }

    let distinct: HashSet<(u64, u64)> = ring.iter().map(Position::key).collect();
    if distinct.len() < MIN_DISTINCT_VERTICES {
        return Err(CoreError::invalid_geometry(
            boundary_id,
            format!(
                "ring {index} has {} distinct vertices, need at least {MIN_DISTINCT_VERTICES}",
                distinct.len()
            ),
        ));
    }

    Ok(ring)
}
