//! Geodesic helpers
//!
//! Great-circle distance between WGS84 coordinates using the haversine formula.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Meters in one statute mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// A point on the globe, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Distance to another coordinate in miles
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_miles(self, other)
    }
}

/// Haversine distance in miles, rounded to 2 decimal places.
///
/// The intermediate term is clamped to `[0, 1]` so antipodal and
/// near-identical points never produce NaN.
pub fn distance_miles(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    round_to(EARTH_RADIUS_MILES * c, 2)
}

/// Convert miles to whole meters, never below 1 m.
///
/// Any positive radius must stay a valid upstream query, so sub-meter
/// values round up to 1 and oversized values clamp to `u32::MAX`.
pub fn miles_to_meters(miles: f64) -> u32 {
    (miles * METERS_PER_MILE)
        .round()
        .clamp(1.0, u32::MAX as f64) as u32
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
