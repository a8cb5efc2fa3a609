//! Embedded web server for the map view.
//!
//! Serves the page and its assets from the binary plus a small JSON API.
//! The position provider is shared state; the page reads its starting
//! center out of the rendered index and asks `/api/distance` afterwards.

mod handlers;
mod state;
mod static_files;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::config::{AppConfig, ConfigError};
use crate::location::PositionProvider;
use state::{AppState, ViewConfig};

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/style.css", get(handlers::style))
        .route("/app.js", get(handlers::script))
        .route("/api/position", get(handlers::position))
        .route("/api/distance", get(handlers::distance))
        .layer(CorsLayer::permissive())
        // The fix can change between requests once the probe lands.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .with_state(state)
}

/// Validate the Maps credentials, bind, and serve until interrupted.
pub async fn start(config: &AppConfig, provider: PositionProvider) -> Result<(), ServeError> {
    let (api_key, map_id) = config.maps.require()?;
    let state = Arc::new(AppState {
        provider,
        view: ViewConfig {
            api_key: api_key.to_string(),
            map_id: map_id.to_string(),
            zoom: config.maps.zoom,
        },
    });

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServeError::Bind {
            addr: addr.clone(),
            source: e,
        })?;

    info!("map view listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
