//! Runtime configuration.
//!
//! Layered lowest to highest: built-in defaults, an optional `compass.toml`
//! next to the working directory, then `COMPASS_*` environment variables
//! (`COMPASS_MAPS__API_KEY`, `COMPASS_SERVER__PORT`, ...). Everything has a
//! default except the Maps credentials, which only `serve` insists on.

use crate::geo::{Coordinate, SCIENCE_WORLD};
use crate::location::ip;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("maps.api_key is not set; export COMPASS_MAPS__API_KEY or add it to compass.toml")]
    MissingApiKey,
    #[error("maps.map_id is not set; export COMPASS_MAPS__MAP_ID or add it to compass.toml")]
    MissingMapId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub maps: MapsConfig,
    #[serde(default)]
    pub locator: LocatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Google Maps credentials and camera defaults for the served page.
#[derive(Debug, Clone, Deserialize)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    pub map_id: Option<String>,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocatorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_lat")]
    pub default_lat: f64,
    #[serde(default = "default_lng")]
    pub default_lng: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            map_id: None,
            zoom: default_zoom(),
        }
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_lat: default_lat(),
            default_lng: default_lng(),
        }
    }
}

impl MapsConfig {
    /// Both credentials, or the error naming the first missing one.
    ///
    /// Empty strings count as missing so `COMPASS_MAPS__API_KEY=""` cannot
    /// smuggle a blank key past startup.
    pub fn require(&self) -> Result<(&str, &str), ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let map_id = self
            .map_id
            .as_deref()
            .filter(|m| !m.is_empty())
            .ok_or(ConfigError::MissingMapId)?;
        Ok((api_key, map_id))
    }
}

impl LocatorConfig {
    pub fn default_position(&self) -> Coordinate {
        Coordinate::new(self.default_lat, self.default_lng)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("compass")
    }

    /// Load with an explicit file stem (no extension). Used by tests to
    /// point at a scratch directory.
    pub fn load_from(stem: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(stem).required(false))
            .add_source(
                Environment::with_prefix("COMPASS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_zoom() -> u8 {
    15
}

fn default_endpoint() -> String {
    ip::DEFAULT_ENDPOINT.to_string()
}

fn default_lat() -> f64 {
    SCIENCE_WORLD.lat
}

fn default_lng() -> f64 {
    SCIENCE_WORLD.lng
}
