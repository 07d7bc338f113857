//! Marker styling: radius from magnitude, color from depth.

use std::fmt;

/// Metres of circle radius per unit of magnitude.
pub const RADIUS_PER_MAGNITUDE: f64 = 50_000.0;

/// Fill opacity for every event circle.
pub const FILL_OPACITY: f64 = 0.75;

/// Lower edges of the legend rows, in km. The last row is open-ended.
pub const DEPTH_BOUNDARIES: [f64; 8] = [-10.0, 10.0, 20.0, 50.0, 100.0, 200.0, 300.0, 500.0];

/// The nine depth buckets, deepest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthColor {
    /// depth > 500
    Blue,
    /// depth > 300
    Cyan,
    /// depth > 200
    Green,
    /// depth > 100
    Yellow,
    /// depth > 50
    Orange,
    /// depth > 20
    Red,
    /// depth > 10
    DarkRed,
    /// depth > 0
    BlueViolet,
    /// depth <= 0, and NaN
    DarkSeaGreen,
}

impl DepthColor {
    /// Hex color string used for both stroke and fill.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Blue => "#0000FF",
            Self::Cyan => "#00FFFF",
            Self::Green => "#00FF00",
            Self::Yellow => "#FFFF00",
            Self::Orange => "#FFA500",
            Self::Red => "#FF0000",
            Self::DarkRed => "#8B0000",
            Self::BlueViolet => "#8A2BE2",
            Self::DarkSeaGreen => "#8FBC8F",
        }
    }
}

impl fmt::Display for DepthColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

/// Circle radius in metres for a magnitude.
///
/// Linear with no clamping: zero or negative magnitudes give a
/// non-positive radius, and the mapping surface decides what to draw.
#[must_use]
pub fn marker_radius(magnitude: f64) -> f64 {
    magnitude * RADIUS_PER_MAGNITUDE
}

/// Bucket color for a depth in km.
///
/// Thresholds are strict, so a depth sitting exactly on a boundary
/// belongs to the shallower bucket.
#[must_use]
pub fn depth_color(depth: f64) -> DepthColor {
    match depth {
        d if d > 500.0 => DepthColor::Blue,
        d if d > 300.0 => DepthColor::Cyan,
        d if d > 200.0 => DepthColor::Green,
        d if d > 100.0 => DepthColor::Yellow,
        d if d > 50.0 => DepthColor::Orange,
        d if d > 20.0 => DepthColor::Red,
        d if d > 10.0 => DepthColor::DarkRed,
        d if d > 0.0 => DepthColor::BlueViolet,
        _ => DepthColor::DarkSeaGreen,
    }
}
