//! Embedded assets for the map view.
//!
//! Everything the browser needs ships inside the binary. The index page
//! carries a `{{BOOT}}` slot that `render_index` fills with one JSON blob
//! (credentials, camera, starting position, landmark); `app.js` reads that
//! blob instead of fetching configuration separately.

use crate::geo::{Coordinate, Landmark};
use serde::Serialize;

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Campus Compass</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
<div id="map"></div>
<script type="application/json" id="boot-config">{{BOOT}}</script>
<script src="/app.js"></script>
</body>
</html>
"#;

pub const APP_JS: &str = r#"'use strict';

function loadMapsApi(key) {
  return new Promise((resolve, reject) => {
    const script = document.createElement('script');
    script.src = 'https://maps.googleapis.com/maps/api/js?key=' + encodeURIComponent(key) +
      '&v=weekly&loading=async&callback=__compassMapsReady';
    script.async = true;
    script.onerror = () => reject(new Error('Maps API failed to load'));
    window.__compassMapsReady = resolve;
    document.head.appendChild(script);
  });
}

async function main() {
  const boot = JSON.parse(document.getElementById('boot-config').textContent);

  await loadMapsApi(boot.apiKey);
  console.log('Maps API has loaded.');

  const { Map, InfoWindow } = await google.maps.importLibrary('maps');
  const { AdvancedMarkerElement, PinElement } = await google.maps.importLibrary('marker');

  const map = new Map(document.getElementById('map'), {
    mapId: boot.mapId,
    center: { lat: boot.center.lat, lng: boot.center.lng },
    zoom: boot.zoom,
  });

  const pin = new PinElement({
    background: '#7abfe9',
    glyphColor: '#000',
    borderColor: '#000',
    scale: 0.75,
  });

  const marker = new AdvancedMarkerElement({
    map,
    position: { lat: boot.center.lat, lng: boot.center.lng },
    content: pin.element,
  });

  const popup = new InfoWindow({ headerDisabled: true });

  async function update(position) {
    marker.position = position;
    map.setCenter(position);
    const res = await fetch('/api/distance?lat=' + position.lat + '&lng=' + position.lng);
    if (!res.ok) {
      return;
    }
    const body = await res.json();
    popup.setContent(body.km.toFixed(2) + ' km away from ' + body.landmark.name);
    popup.open({ map: map, anchor: marker });
  }

  await update({ lat: boot.center.lat, lng: boot.center.lng });

  if (navigator.geolocation) {
    // One shot, no error callback: staying on the default is the fallback.
    navigator.geolocation.getCurrentPosition(pos => {
      console.log(pos);
      update({ lat: pos.coords.latitude, lng: pos.coords.longitude });
    });
  }
}

main();
"#;

pub const STYLE_CSS: &str = r#"html,
body {
  height: 100%;
  margin: 0;
  font-family: system-ui, sans-serif;
}

#map {
  height: 100%;
  width: 100%;
}
"#;

/// The one JSON blob the page boots from, camelCase for the JS side.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BootConfig<'a> {
    pub api_key: &'a str,
    pub map_id: &'a str,
    pub zoom: u8,
    pub center: Coordinate,
    pub landmark: Landmark,
}

pub(super) fn render_index(boot: &BootConfig) -> String {
    // Keep a literal </script> inside a credential from closing the tag early.
    let json = serde_json::to_string(boot)
        .unwrap()
        .replace('<', "\\u003c");
    INDEX_HTML.replace("{{BOOT}}", &json)
}
