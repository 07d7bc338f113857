//! The mapping surface the renderer draws on.
//!
//! Projection, tiling, panning and popups belong to the surface; the
//! renderer only issues these calls, one writer at a time.

/// A geographic point, latitude first as Leaflet expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Initial map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: LatLng::new(0.0, 0.0),
            zoom: 2,
        }
    }
}

/// Base tile source.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap".to_string(),
            max_zoom: 19,
        }
    }
}

/// A geographic circle whose radius is in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleMarker {
    pub center: LatLng,
    pub radius: f64,
    pub stroke_color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
}

/// Handle returned by [`MapSurface::draw_circle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub usize);

/// Corner a control panel is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl ControlPosition {
    /// Leaflet's name for the corner.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "topleft",
            Self::TopRight => "topright",
            Self::BottomLeft => "bottomleft",
            Self::BottomRight => "bottomright",
        }
    }
}

/// An interactive map that accepts markers, popups and control panels.
pub trait MapSurface {
    /// Set the initial center and zoom.
    fn set_view(&mut self, viewport: Viewport);

    /// Add the base tile layer.
    fn add_tile_layer(&mut self, layer: TileLayer);

    /// Place a circle and return a handle for later binding.
    fn draw_circle(&mut self, marker: CircleMarker) -> MarkerHandle;

    /// Attach popup HTML to a previously drawn marker.
    fn bind_popup(&mut self, marker: MarkerHandle, html: String);

    /// Pin a control panel with the given HTML content.
    fn add_control(&mut self, position: ControlPosition, html: String);
}
