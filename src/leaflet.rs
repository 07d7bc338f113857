//! A [`MapSurface`] that compiles draw calls into a standalone Leaflet page.
//!
//! Each call appends one JavaScript statement. User-supplied strings are
//! embedded as JSON string literals, which are also valid JS literals.

use std::fmt::Write as _;

use crate::surface::{
    CircleMarker, ControlPosition, LatLng, MapSurface, MarkerHandle, TileLayer, Viewport,
};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const PAGE_STYLE: &str = r"
    html, body, #map { height: 100%; margin: 0; }
    .info { padding: 6px 8px; font: 14px/16px Arial, Helvetica, sans-serif;
            background: rgba(255,255,255,0.85); box-shadow: 0 0 15px rgba(0,0,0,0.2);
            border-radius: 5px; }
    .legend { line-height: 18px; color: #555; }
    .legend i { width: 18px; height: 18px; float: left; margin-right: 8px; opacity: 0.75; }
";

/// Accumulated Leaflet script for one map.
#[derive(Debug, Default)]
pub struct LeafletPage {
    statements: Vec<String>,
    markers: usize,
}

impl LeafletPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of circles drawn so far.
    #[must_use]
    pub const fn marker_count(&self) -> usize {
        self.markers
    }

    /// The script body, one statement per line.
    #[must_use]
    pub fn script(&self) -> String {
        self.statements.join("\n")
    }

    /// Wrap the script in a complete HTML document.
    #[must_use]
    pub fn into_html(self, title: &str) -> String {
        let title = escape_html(title);
        let script = self.script();
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <link rel="stylesheet" href="{LEAFLET_CSS}" />
  <script src="{LEAFLET_JS}"></script>
  <style>{PAGE_STYLE}</style>
</head>
<body>
  <div id="map"></div>
  <script>
const map = L.map('map');
const markers = [];
{script}
  </script>
</body>
</html>
"#
        )
    }

    fn push(&mut self, statement: String) {
        self.statements.push(statement);
    }
}

impl MapSurface for LeafletPage {
    fn set_view(&mut self, viewport: Viewport) {
        self.push(format!(
            "map.setView({}, {});",
            lat_lng(viewport.center),
            viewport.zoom
        ));
    }

    fn add_tile_layer(&mut self, layer: TileLayer) {
        self.push(format!(
            "L.tileLayer({}, {{ maxZoom: {}, attribution: {} }}).addTo(map);",
            js_string(&layer.url_template),
            layer.max_zoom,
            js_string(&layer.attribution)
        ));
    }

    fn draw_circle(&mut self, marker: CircleMarker) -> MarkerHandle {
        let handle = MarkerHandle(self.markers);
        self.markers += 1;
        self.push(format!(
            "markers.push(L.circle({}, {{ color: {}, fillColor: {}, \
             fillOpacity: {}, radius: {} }}).addTo(map));",
            lat_lng(marker.center),
            js_string(&marker.stroke_color),
            js_string(&marker.fill_color),
            js_number(marker.fill_opacity),
            js_number(marker.radius)
        ));
        handle
    }

    fn bind_popup(&mut self, marker: MarkerHandle, html: String) {
        self.push(format!("markers[{}].bindPopup({});", marker.0, js_string(&html)));
    }

    fn add_control(&mut self, position: ControlPosition, html: String) {
        let mut statement = String::new();
        let _ = write!(
            statement,
            "(function () {{ const c = L.control({{ position: {} }}); \
             c.onAdd = function () {{ const div = L.DomUtil.create('div', 'info legend'); \
             div.innerHTML = {}; return div; }}; c.addTo(map); }})();",
            js_string(position.as_str()),
            js_string(&html)
        );
        self.push(statement);
    }
}

/// Escape text for inclusion in HTML element content or attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote a string as a JS literal that is safe inside a `<script>` block.
fn js_string(text: &str) -> String {
    // JSON strings are JS strings; `</` must not close the script element.
    serde_json::Value::from(text).to_string().replace("</", "<\\/")
}

/// Non-finite numbers have no JS literal form that Leaflet accepts.
fn js_number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        "0".to_string()
    }
}

fn lat_lng(point: LatLng) -> String {
    format!("[{}, {}]", js_number(point.lat), js_number(point.lng))
}
