use std::fmt;

pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;

/// A vertex in GeoJSON axis order: longitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.lon)
            && (MIN_LATITUDE..=MAX_LATITUDE).contains(&self.lat)
    }

    /// Bit pattern used for exact vertex comparison (`-0.0` folds into `0.0`).
    pub(crate) fn key(&self) -> (u64, u64) {
        ((self.lon + 0.0).to_bits(), (self.lat + 0.0).to_bits())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lon, self.lat)
    }
}
