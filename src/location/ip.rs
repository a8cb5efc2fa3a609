//! IP-based geolocation via the ipapi.co JSON endpoint.
//!
//! One plain GET, no API key. The caller decides what a failure means;
//! this module only maps transport and shape problems onto `LocationError`.

use super::types::{LocationError, PositionFix};
use crate::geo::Coordinate;
use serde::Deserialize;
use tracing::debug;

/// Default lookup endpoint; overridable through `locator.endpoint`.
pub const DEFAULT_ENDPOINT: &str = "https://ipapi.co";

#[derive(Debug, Deserialize)]
struct IpApiResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
}

/// Look up the public-IP position once, blocking.
///
/// No retry and no explicit timeout: the provider treats any failure as
/// "stay on the default", so a slow or dead endpoint costs nothing but the
/// one hanging thread.
pub fn locate(endpoint: &str) -> Result<PositionFix, LocationError> {
    let url = format!("{}/json/", endpoint.trim_end_matches('/'));

    let response = ureq::get(&url)
        .set("User-Agent", "CampusCompass/0.3")
        .call()
        .map_err(|e| LocationError::Network(e.to_string()))?;

    let data: IpApiResult = response
        .into_json()
        .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

    let (lat, lng) = match (data.latitude, data.longitude) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Err(LocationError::InvalidResponse(
                "response missing latitude/longitude".to_string(),
            ))
        }
    };

    debug!(
        city = data.city.as_deref().unwrap_or("?"),
        country = data.country_name.as_deref().unwrap_or("?"),
        "IP geolocation answered"
    );

    Ok(PositionFix::ip(Coordinate::new(lat, lng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::types::PositionSource;

    #[test]
    fn test_locate_parses_valid_response() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ip":"24.80.1.1","city":"Vancouver","country_name":"Canada",
                    "latitude":49.2827,"longitude":-123.1207}"#,
            )
            .create();

        let fix = locate(&server.url()).unwrap();
        mock.assert();

        assert_eq!(fix.source, PositionSource::IpApi);
        assert!(fix.resolved_at.is_some());
        assert!((fix.coordinate.lat - 49.2827).abs() < 1e-9);
        assert!((fix.coordinate.lng + 123.1207).abs() < 1e-9);
    }

    #[test]
    fn test_locate_rejects_missing_coordinates() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ip":"24.80.1.1","city":"Vancouver"}"#)
            .create();

        let err = locate(&server.url()).unwrap_err();
        mock.assert();
        assert!(matches!(err, LocationError::InvalidResponse(_)), "got {err:?}");
    }

    #[test]
    fn test_locate_rejects_non_json_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/json/")
            .with_status(200)
            .with_body("rate limit exceeded")
            .create();

        let err = locate(&server.url()).unwrap_err();
        mock.assert();
        assert!(matches!(err, LocationError::InvalidResponse(_)), "got {err:?}");
    }

    #[test]
    fn test_locate_maps_transport_failure_to_network() {
        // Nothing listens on this port.
        let err = locate("http://127.0.0.1:9").unwrap_err();
        assert!(matches!(err, LocationError::Network(_)), "got {err:?}");
    }

    #[test]
    fn test_locate_normalizes_trailing_slash() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/json/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"latitude":1.0,"longitude":2.0}"#)
            .create();

        let url = format!("{}/", server.url());
        locate(&url).unwrap();
        mock.assert();
    }
}
