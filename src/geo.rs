//! Great-circle geometry over a spherical Earth.
//!
//! Implements the haversine form of the spherical law of cosines. Accuracy
//! versus an ellipsoidal model is ~0.5%, which is accepted for this use.
//! Pure functions only: no provider, config, or rendering concerns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ─── Coordinates ────────────────────────────────────────────────

/// A (latitude, longitude) pair in decimal degrees.
///
/// No range validation is performed here; callers at the HTTP and CLI
/// boundaries reject out-of-range values before constructing one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Format a coordinate with hemisphere letters, e.g. `49.1324° N, 122.8712° W`.
pub fn format_coords(c: Coordinate) -> String {
    let ns = if c.lat >= 0.0 { 'N' } else { 'S' };
    let ew = if c.lng >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}° {}, {:.4}° {}", c.lat.abs(), ns, c.lng.abs(), ew)
}

// ─── Landmarks ──────────────────────────────────────────────────

/// A named fixed point distances are measured against.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Landmark {
    pub name: &'static str,
    pub position: Coordinate,
}

impl Landmark {
    /// Display-rounded distance from `from` to this landmark.
    pub fn distance_from(&self, from: Coordinate) -> f64 {
        distance_km(from, self.position)
    }
}

/// The reference point every distance is measured to.
pub const KPU_SURREY_LIBRARY: Landmark = Landmark {
    name: "KPU Surrey Library",
    position: Coordinate::new(49.13244672377832, -122.8712181425452),
};

/// Science World, the shipped default viewer position. Used until (and
/// unless) geolocation resolves.
pub const SCIENCE_WORLD: Coordinate = Coordinate::new(49.27419524703112, -123.10334230846034);

// ─── Distance ───────────────────────────────────────────────────

/// Exact great-circle distance between two coordinates, in kilometers.
///
/// `d = 2R · asin( √( sin²(Δlat/2) + cos(lat_a)·cos(lat_b)·sin²(Δlng/2) ) )`
///
/// Total over valid coordinate ranges with no failure path. Out-of-range
/// inputs are not rejected; a violated asin/sqrt domain propagates as NaN.
pub fn great_circle_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Great-circle distance rounded to two decimals, the display contract.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    round2(great_circle_km(a, b))
}

fn round2(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
