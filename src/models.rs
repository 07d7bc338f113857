//! Data models for the USGS GeoJSON summary feeds.
//!
//! The envelope keeps its features as raw JSON values so one malformed
//! entry can be skipped without rejecting the whole feed.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::errors::{FeedError, RecordError};

/// Top-level GeoJSON response from USGS feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// "FeatureCollection" when present
    #[serde(rename = "type", default)]
    pub type_: Option<String>,

    /// Feed metadata
    #[serde(default)]
    pub metadata: Option<Metadata>,

    /// Unparsed feature entries, in feed order
    pub features: Vec<serde_json::Value>,
}

impl FeatureCollection {
    /// Validate the response structure.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidEnvelope`] when `type` names something
    /// other than a feature collection.
    pub fn validate(&self) -> Result<(), FeedError> {
        match self.type_.as_deref() {
            None | Some("FeatureCollection") => Ok(()),
            Some(other) => Err(FeedError::InvalidEnvelope(format!(
                "expected type 'FeatureCollection', got '{other}'"
            ))),
        }
    }
}

/// Metadata about the feed response.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Human-readable title
    pub title: Option<String>,

    /// Number of events in response
    pub count: Option<usize>,
}

/// A single earthquake event as the feed encodes it.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Geographic location
    pub geometry: Geometry,

    /// Event properties
    pub properties: Properties,
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Coordinates: [longitude, latitude, depth_km]
    pub coordinates: Vec<f64>,
}

/// The event properties the map uses.
#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    /// Magnitude value
    pub mag: Option<f64>,

    /// Human-readable place description
    pub place: Option<String>,

    /// Event time (ms since epoch)
    pub time: i64,
}

/// One event, flattened to the fields a marker needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEventRecord {
    pub longitude: f64,
    pub latitude: f64,
    /// Kilometres, positive down; may be negative above sea level
    pub depth_km: f64,
    pub magnitude: f64,
    pub place: Option<String>,
    /// Event time (ms since epoch, UTC)
    pub time_ms: i64,
}

impl RawEventRecord {
    /// Get the event time as a `DateTime<Utc>`.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time_ms).single()
    }
}

impl TryFrom<Feature> for RawEventRecord {
    type Error = RecordError;

    fn try_from(feature: Feature) -> Result<Self, Self::Error> {
        let coords = &feature.geometry.coordinates;
        let &[longitude, latitude, depth_km, ..] = coords.as_slice() else {
            return Err(RecordError::Coordinates(coords.len()));
        };
        let magnitude = feature
            .properties
            .mag
            .ok_or(RecordError::MissingMagnitude)?;

        Ok(Self {
            longitude,
            latitude,
            depth_km,
            magnitude,
            place: feature.properties.place,
            time_ms: feature.properties.time,
        })
    }
}

impl TryFrom<serde_json::Value> for RawEventRecord {
    type Error = RecordError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let feature: Feature = serde_json::from_value(value)?;
        Self::try_from(feature)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_sample_feed() {
        let json = include_str!("../tools/sample_feed.json");
        let feed: FeatureCollection =
            serde_json::from_str(json).expect("failed to parse sample feed");

        feed.validate().expect("invalid feed");
        assert_eq!(feed.features.len(), 4);
        assert_eq!(feed.metadata.and_then(|m| m.count), Some(4));

        let records: Vec<Result<RawEventRecord, RecordError>> = feed
            .features
            .into_iter()
            .map(RawEventRecord::try_from)
            .collect();

        let first = records[0].as_ref().expect("first record");
        assert!((first.longitude - (-122.4)).abs() < 1e-9);
        assert!((first.latitude - 37.8).abs() < 1e-9);
        assert!((first.depth_km - 5.2).abs() < 1e-9);
        assert_eq!(first.place.as_deref(), Some("Bay Area"));
        assert_eq!(first.time_ms, 1_700_000_000_000);

        assert!(matches!(records[2], Err(RecordError::MissingMagnitude)));
        // Negative depth and a null place pass through untouched.
        let last = records[3].as_ref().expect("last record");
        assert!(last.depth_km < 0.0);
        assert!(last.place.is_none());
    }

    #[test]
    fn test_wrong_envelope_type() {
        let feed: FeatureCollection =
            serde_json::from_value(json!({ "type": "Feature", "features": [] })).unwrap();
        assert!(matches!(feed.validate(), Err(FeedError::InvalidEnvelope(_))));
    }

    #[test]
    fn test_missing_feature_list() {
        let value = json!({ "type": "FeatureCollection" });
        let result = serde_json::from_value::<FeatureCollection>(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_short_coordinates() {
        let value = json!({
            "geometry": { "coordinates": [10.0, 20.0] },
            "properties": { "mag": 1.0, "place": "x", "time": 0 }
        });
        assert!(matches!(
            RawEventRecord::try_from(value),
            Err(RecordError::Coordinates(2))
        ));
    }

    #[test]
    fn test_non_numeric_magnitude_is_malformed() {
        let value = json!({
            "geometry": { "coordinates": [10.0, 20.0, 1.0] },
            "properties": { "mag": "big", "place": "x", "time": 0 }
        });
        assert!(matches!(
            RawEventRecord::try_from(value),
            Err(RecordError::Malformed(_))
        ));
    }

    #[test]
    fn test_record_time() {
        let record = RawEventRecord {
            longitude: 0.0,
            latitude: 0.0,
            depth_km: 0.0,
            magnitude: 1.0,
            place: None,
            time_ms: 1_700_000_000_000,
        };
        let time = record.time().expect("valid time");
        assert_eq!(time.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}
