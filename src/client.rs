//! Feed loader for the USGS earthquake summary feeds.
//!
//! One async GET per render pass, no retry. Uses reqwest with rustls for TLS.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::errors::FeedError;
use crate::models::{FeatureCollection, RawEventRecord};

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent string for API requests.
const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));

/// USGS base URL for earthquake feeds.
const USGS_BASE_URL: &str = "https://earthquake.usgs.gov";

/// Smallest magnitude a summary feed includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threshold {
    #[default]
    All,
    M1,
    M2_5,
    M4_5,
    /// USGS "significant" events, ranked by impact rather than magnitude
    Significant,
}

impl Threshold {
    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::M1 => "1.0",
            Self::M2_5 => "2.5",
            Self::M4_5 => "4.5",
            Self::Significant => "significant",
        }
    }
}

/// Time window a summary feed covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Hour,
    Day,
    #[default]
    Week,
    Month,
}

impl Period {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// One USGS summary feed, named `<threshold>_<period>` (e.g. `2.5_day`).
///
/// Defaults to `all_week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedType {
    pub threshold: Threshold,
    pub period: Period,
}

impl FeedType {
    #[must_use]
    pub const fn new(threshold: Threshold, period: Period) -> Self {
        Self { threshold, period }
    }

    /// Full GeoJSON URL of this summary feed.
    #[must_use]
    pub fn url(self) -> String {
        format!("{USGS_BASE_URL}/earthquakes/feed/v1.0/summary/{self}.geojson")
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.threshold.as_str(), self.period.as_str())
    }
}

impl std::str::FromStr for FeedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let unknown = || format!("unknown feed type: {s} (expected e.g. all_week, 4.5_day)");
        let (threshold, period) = lower.rsplit_once('_').ok_or_else(unknown)?;

        let threshold = match threshold {
            "all" => Threshold::All,
            "1.0" => Threshold::M1,
            "2.5" => Threshold::M2_5,
            "4.5" => Threshold::M4_5,
            "significant" => Threshold::Significant,
            _ => return Err(unknown()),
        };
        let period = match period {
            "hour" => Period::Hour,
            "day" => Period::Day,
            "week" => Period::Week,
            "month" => Period::Month,
            _ => return Err(unknown()),
        };
        Ok(Self::new(threshold, period))
    }
}

/// Loads event records from one feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedLoader {
    client: Client,
    url: String,
}

impl FeedLoader {
    /// Create a loader for an arbitrary endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(url: impl Into<String>) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The endpoint this loader fetches.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the feed and parse it into records, in feed order.
    ///
    /// Entries that cannot become a record are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Fetch kind for transport failures and non-success statuses, parse
    /// kind when the body is not a feature collection.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn load(&self) -> Result<Vec<RawEventRecord>, FeedError> {
        debug!("fetching feed");

        let response = self.client.get(&self.url).send().await?;

        // Check status before parsing
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        // Read as text so decode failures surface as parse errors.
        let body = response.text().await?;
        let feed: FeatureCollection = serde_json::from_str(&body)?;
        feed.validate()?;
        let reported = feed.metadata.as_ref().and_then(|m| m.count);
        if let Some(title) = feed.metadata.as_ref().and_then(|m| m.title.as_deref()) {
            debug!("received \"{title}\"");
        }

        let total = feed.features.len();
        let mut records = Vec::with_capacity(total);
        for (index, entry) in feed.features.into_iter().enumerate() {
            let id = entry
                .get("id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("?")
                .to_string();
            match RawEventRecord::try_from(entry) {
                Ok(record) => records.push(record),
                Err(e) => warn!(index, id = %id, "skipping feature: {e}"),
            }
        }

        let skipped = total - records.len();
        if skipped > 0 {
            warn!("skipped {skipped} of {total} features");
        }
        debug!(reported = ?reported, "parsed {} events", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_type_parse() {
        let feed: FeedType = "4.5_day".parse().expect("failed to parse");
        assert_eq!(feed, FeedType::new(Threshold::M4_5, Period::Day));

        let feed: FeedType = "Significant_Month".parse().expect("failed to parse");
        assert_eq!(feed.to_string(), "significant_month");

        for bad in ["weekly", "all", "3.0_day", "all_year", ""] {
            assert!(bad.parse::<FeedType>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_every_feed_name_parses_back() {
        let thresholds = [
            Threshold::All,
            Threshold::M1,
            Threshold::M2_5,
            Threshold::M4_5,
            Threshold::Significant,
        ];
        let periods = [Period::Hour, Period::Day, Period::Week, Period::Month];
        for threshold in thresholds {
            for period in periods {
                let feed = FeedType::new(threshold, period);
                assert_eq!(feed.to_string().parse::<FeedType>(), Ok(feed));
            }
        }
    }

    #[test]
    fn test_default_feed_url() {
        assert_eq!(
            FeedType::default().url(),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"
        );
    }
}
