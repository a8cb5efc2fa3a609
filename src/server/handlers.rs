use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::geo::{self, Coordinate, Landmark, KPU_SURREY_LIBRARY};
use crate::location::{PositionSource, ProbeStatus};

use super::state::AppState;
use super::static_files::{self, BootConfig};

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── Static file handlers ────────────────────────────────────────

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let fix = state.provider.snapshot();
    let boot = BootConfig {
        api_key: &state.view.api_key,
        map_id: &state.view.map_id,
        zoom: state.view.zoom,
        center: fix.coordinate,
        landmark: KPU_SURREY_LIBRARY,
    };
    Html(static_files::render_index(&boot))
}

pub async fn style() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        static_files::STYLE_CSS,
    )
        .into_response()
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

// ─── GET /api/position ───────────────────────────────────────────

#[derive(Serialize)]
pub struct PositionResponse {
    pub lat: f64,
    pub lng: f64,
    pub source: PositionSource,
    pub probe: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub formatted_coords: String,
}

pub async fn position(State(state): State<Arc<AppState>>) -> Json<PositionResponse> {
    let fix = state.provider.snapshot();
    Json(PositionResponse {
        lat: fix.coordinate.lat,
        lng: fix.coordinate.lng,
        source: fix.source,
        probe: state.provider.status(),
        resolved_at: fix.resolved_at,
        formatted_coords: geo::format_coords(fix.coordinate),
    })
}

// ─── GET /api/distance ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct DistanceQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Serialize)]
pub struct DistanceResponse {
    pub km: f64,
    pub from: Coordinate,
    pub source: PositionSource,
    pub landmark: Landmark,
}

/// Distance from a point to the landmark. With no query parameters the
/// provider's current fix is the starting point, so the page can call this
/// before (and after) browser geolocation answers.
pub async fn distance(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DistanceQuery>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let start = Instant::now();

    let (from, source) = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                return Err(api_error(
                    StatusCode::BAD_REQUEST,
                    "Invalid coordinates. Lat: -90..90, Lng: -180..180",
                ));
            }
            (Coordinate::new(lat, lng), PositionSource::Manual)
        }
        (None, None) => {
            let fix = state.provider.snapshot();
            (fix.coordinate, fix.source)
        }
        _ => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Provide both 'lat' and 'lng', or neither",
            ));
        }
    };

    let km = KPU_SURREY_LIBRARY.distance_from(from);

    info!(
        km,
        lat = from.lat,
        lng = from.lng,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/distance"
    );

    Ok(Json(DistanceResponse {
        km,
        from,
        source,
        landmark: KPU_SURREY_LIBRARY,
    }))
}
