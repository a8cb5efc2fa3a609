//! Campus Compass: a geolocated map view engine.
//!
//! Resolves the viewer's position (IP geolocation with an explicit default),
//! computes the great-circle distance to the KPU Surrey Library, and serves a
//! single-page map view with a marker and a popup showing that distance.

pub mod config;
pub mod geo;
pub mod location;
pub mod server;
