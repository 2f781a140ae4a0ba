use crate::{BoundingBox, Position};

/// Maximum distance, in degrees, at which a point counts as on a ring edge.
const EDGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GeometryKind {
    Polygon,
    MultiPolygon,
}

/// A single polygon: one exterior ring and zero or more holes.
///
/// Rings are open (the closing vertex is not repeated) and hold at least
/// three distinct vertices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Polygon {
    pub(crate) exterior: Vec<Position>,
    pub(crate) holes: Vec<Vec<Position>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RingLocation {
    Inside,
    Boundary,
    Outside,
}

impl Polygon {
    /// Closed-set semantics: the boundary belongs to the polygon.
    ///
    /// A point on the exterior edge is contained. A point on a hole's edge is
    /// contained too, since it is on the polygon boundary and not strictly
    /// inside the hole.
    fn contains(&self, x: f64, y: f64) -> bool {
        match locate(&self.exterior, x, y) {
            RingLocation::Outside => false,
            RingLocation::Boundary => true,
            RingLocation::Inside => !self
                .holes
                .iter()
                .any(|hole| locate(hole, x, y) == RingLocation::Inside),
        }
    }
}

/// Ray casting with an explicit on-edge check.
fn locate(ring: &[Position], x: f64, y: f64) -> RingLocation {
    let n = ring.len();
    let mut inside = false;

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];

        if on_segment(a, b, x, y) {
            return RingLocation::Boundary;
        }

        if (a.lat > y) != (b.lat > y) {
            let crossing = a.lon + (y - a.lat) * (b.lon - a.lon) / (b.lat - a.lat);
            if x < crossing {
                inside = !inside;
            }
        }
    }

    if inside {
        RingLocation::Inside
    } else {
        RingLocation::Outside
    }
}

fn on_segment(a: Position, b: Position, x: f64, y: f64) -> bool {
    let dx = b.lon - a.lon;
    let dy = b.lat - a.lat;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return (x - a.lon).hypot(y - a.lat) <= EDGE_EPSILON;
    }

    // Distance from the edge's line, independent of edge length
    let cross = dx * (y - a.lat) - dy * (x - a.lon);
    if cross.abs() / length > EDGE_EPSILON {
        return false;
    }

    x >= a.lon.min(b.lon) - EDGE_EPSILON
        && x <= a.lon.max(b.lon) + EDGE_EPSILON
        && y >= a.lat.min(b.lat) - EDGE_EPSILON
        && y <= a.lat.max(b.lat) + EDGE_EPSILON
}

/// "Is this location inside this boundary", built once per boundary.
///
/// Coordinates are planar lon/lat; rings crossing the antimeridian are not
/// split.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainmentPredicate {
    boundary_id: String,
    kind: GeometryKind,
    polygons: Vec<Polygon>,
    bbox: BoundingBox,
}

impl ContainmentPredicate {
    pub(crate) fn new(
        boundary_id: String,
        kind: GeometryKind,
        polygons: Vec<Polygon>,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            boundary_id,
            kind,
            polygons,
            bbox,
        }
    }

    pub fn boundary_id(&self) -> &str {
        &self.boundary_id
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        if !latitude.is_finite() || !longitude.is_finite() {
            return false;
        }

        if !self.bbox.contains(latitude, longitude) {
            return false;
        }

        self.polygons
            .iter()
            .any(|polygon| polygon.contains(longitude, latitude))
    }

    /// WKT form (`lon lat` order, rings closed) for spatial SQL backends.
    pub fn to_wkt(&self) -> String {
        let polygons: Vec<String> = self.polygons.iter().map(polygon_wkt).collect();

        match self.kind {
            GeometryKind::Polygon => format!("POLYGON{}", polygons.join(",")),
            GeometryKind::MultiPolygon => format!("MULTIPOLYGON({})", polygons.join(",")),
        }
    }
}

fn polygon_wkt(polygon: &Polygon) -> String {
    let rings: Vec<String> = std::iter::once(&polygon.exterior)
        .chain(polygon.holes.iter())
        .map(|ring| ring_wkt(ring))
        .collect();

    format!("({})", rings.join(","))
}

fn ring_wkt(ring: &[Position]) -> String {
    let vertices: Vec<String> = ring
        .iter()
        .chain(ring.first())
        .map(Position::to_string)
        .collect();

    format!("({})", vertices.join(","))
}
