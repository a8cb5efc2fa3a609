//! Viewer position subsystem.
//!
//! A `PositionProvider` hands out the best-known position: the configured
//! default first, upgraded in place if the single IP-geolocation probe
//! comes back. Lookup failure is silent and the default keeps serving.

pub mod ip;
pub mod provider;
pub mod types;

pub use provider::{PositionProvider, Probe};
pub use types::{LocationError, PositionFix, PositionSource, ProbeStatus};
