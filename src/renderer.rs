//! Render driver: feed records in, markers and a depth legend out.
//!
//! A pass sets up the base map and legend, awaits the feed once, then
//! draws every record synchronously in feed order.

use chrono::{DateTime, Local, Utc};
use tracing::{debug, error, info, instrument};

use crate::client::FeedLoader;
use crate::errors::FeedError;
use crate::leaflet::escape_html;
use crate::models::RawEventRecord;
use crate::style::{self, DepthColor, DEPTH_BOUNDARIES, FILL_OPACITY};
use crate::surface::{CircleMarker, ControlPosition, LatLng, MapSurface, TileLayer, Viewport};

/// How popup timestamps are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeDisplay {
    #[default]
    Utc,
    /// The zone of the machine doing the rendering
    Local,
}

/// Everything about a pass that does not come from the feed.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub viewport: Viewport,
    pub tile_layer: TileLayer,
    pub legend_position: ControlPosition,
    pub time_display: TimeDisplay,
}

/// Outcome of a successful pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub markers_drawn: usize,
}

/// One row of the depth legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendRow {
    pub from: f64,
    /// `None` for the open-ended deepest row
    pub to: Option<f64>,
    pub color: DepthColor,
}

impl LegendRow {
    /// Range label, e.g. `10–20` or `500+`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.to {
            Some(to) => format!("{}–{}", self.from, to),
            None => format!("{}+", self.from),
        }
    }
}

/// Legend rows, shallowest first. Each row takes the color just past its
/// lower edge.
#[must_use]
pub fn legend_rows() -> Vec<LegendRow> {
    DEPTH_BOUNDARIES
        .iter()
        .enumerate()
        .map(|(i, &from)| LegendRow {
            from,
            to: DEPTH_BOUNDARIES.get(i + 1).copied(),
            color: style::depth_color(from + 1.0),
        })
        .collect()
}

/// Legend panel HTML.
#[must_use]
pub fn legend_html() -> String {
    let rows: Vec<String> = legend_rows()
        .iter()
        .map(|row| format!(r#"<i style="background:{}"></i> {}"#, row.color, row.label()))
        .collect();
    format!("<strong>Depth (km)</strong><br>{}", rows.join("<br>"))
}

/// Human-readable event time; `"unknown"` when the timestamp was out of range.
#[must_use]
pub fn format_time(time: Option<DateTime<Utc>>, display: TimeDisplay) -> String {
    let Some(time) = time else {
        return "unknown".into();
    };
    match display {
        TimeDisplay::Utc => time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        TimeDisplay::Local => {
            let local: DateTime<Local> = time.with_timezone(&Local);
            local.format("%Y-%m-%d %H:%M:%S %:z").to_string()
        }
    }
}

/// Popup HTML for one event.
#[must_use]
pub fn popup_html(record: &RawEventRecord, display: TimeDisplay) -> String {
    let place = record
        .place
        .as_deref()
        .map_or_else(|| "Unknown location".to_string(), escape_html);
    format!(
        "<strong>Location:</strong> {place}<br>\
         <strong>Magnitude:</strong> {}<br>\
         <strong>Depth:</strong> {} km<br>\
         <strong>Time:</strong> {}",
        record.magnitude,
        record.depth_km,
        format_time(record.time(), display)
    )
}

/// Drives one or more render passes with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[must_use]
    pub const fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Run one pass: base map and legend, then one marker per record.
    ///
    /// # Errors
    ///
    /// Returns the loader's error after logging it. No markers are drawn
    /// in that case; the base map and legend are already in place.
    #[instrument(skip_all, fields(url = loader.url()))]
    pub async fn render<S: MapSurface>(
        &self,
        loader: &FeedLoader,
        surface: &mut S,
    ) -> Result<RenderSummary, FeedError> {
        surface.set_view(self.config.viewport);
        surface.add_tile_layer(self.config.tile_layer.clone());
        surface.add_control(self.config.legend_position, legend_html());

        let records = match loader.load().await {
            Ok(records) => records,
            Err(e) => {
                error!(
                    fetch = e.is_fetch(),
                    parse = e.is_parse(),
                    "error loading the data: {e}"
                );
                return Err(e);
            }
        };

        let markers_drawn = self.draw_records(&records, surface);
        info!("rendered {markers_drawn} earthquakes");
        Ok(RenderSummary { markers_drawn })
    }

    /// Draw records in the given order. Returns the number drawn.
    pub fn draw_records<S: MapSurface>(
        &self,
        records: &[RawEventRecord],
        surface: &mut S,
    ) -> usize {
        for record in records {
            let color = style::depth_color(record.depth_km).hex().to_string();
            let handle = surface.draw_circle(CircleMarker {
                center: LatLng::new(record.latitude, record.longitude),
                radius: style::marker_radius(record.magnitude),
                stroke_color: color.clone(),
                fill_color: color,
                fill_opacity: FILL_OPACITY,
            });
            surface.bind_popup(handle, popup_html(record, self.config.time_display));
        }
        debug!("drew {} markers", records.len());
        records.len()
    }
}
