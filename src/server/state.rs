use crate::location::PositionProvider;

/// Map credentials and camera settings, validated once at startup so the
/// handlers never have to deal with a missing key.
#[derive(Clone)]
pub struct ViewConfig {
    pub api_key: String,
    pub map_id: String,
    pub zoom: u8,
}

pub struct AppState {
    pub provider: PositionProvider,
    pub view: ViewConfig,
}
