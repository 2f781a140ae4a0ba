use crate::Position;

/// Axis-aligned envelope, inclusive on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;

        let mut bbox = Self {
            min_lon: first.lon,
            min_lat: first.lat,
            max_lon: first.lon,
            max_lat: first.lat,
        };
        for position in iter {
            bbox.expand(position);
        }

        Some(bbox)
    }

    pub fn expand(&mut self, position: &Position) {
        self.min_lon = self.min_lon.min(position.lon);
        self.min_lat = self.min_lat.min(position.lat);
        self.max_lon = self.max_lon.max(position.lon);
        self.max_lat = self.max_lat.max(position.lat);
    }

    pub fn merge(&mut self, other: &BoundingBox) {
        self.min_lon = self.min_lon.min(other.min_lon);
        self.min_lat = self.min_lat.min(other.min_lat);
        self.max_lon = self.max_lon.max(other.max_lon);
        self.max_lat = self.max_lat.max(other.max_lat);
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }
}
