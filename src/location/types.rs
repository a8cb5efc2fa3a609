//! Position data types shared by the CLI and the map-view server.

use crate::geo::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    /// The shipped default; nothing has resolved (or resolution failed).
    Default,
    /// Resolved from the viewer's public IP address.
    IpApi,
    /// Supplied explicitly on the command line.
    Manual,
}

impl fmt::Display for PositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PositionSource::Default => "default",
            PositionSource::IpApi => "IP",
            PositionSource::Manual => "manual",
        };
        write!(f, "{label}")
    }
}

/// A coordinate plus its provenance.
///
/// `resolved_at` is set only for fixes that came back from a lookup, so a
/// serialized default fix carries no timestamp field at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionFix {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub source: PositionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl PositionFix {
    /// The fix a provider starts from.
    pub const fn default_at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            source: PositionSource::Default,
            resolved_at: None,
        }
    }

    pub const fn manual(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            source: PositionSource::Manual,
            resolved_at: None,
        }
    }

    pub fn ip(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            source: PositionSource::IpApi,
            resolved_at: Some(Utc::now()),
        }
    }
}

/// Lifecycle of the single background lookup a provider performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// No lookup was started (offline provider).
    Idle,
    /// The lookup is in flight; snapshots still return the default.
    Pending,
    Resolved,
    Failed,
}

/// Errors from position lookups.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid geolocation response: {0}")]
    InvalidResponse(String),
}
