//! Error types for quakemap.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that end a render pass at the feed level.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Transport failure: connect, timeout, or body read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Feed endpoint returned a non-success status
    #[error("feed returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Body is not JSON or lacks the feature list
    #[error("failed to parse feed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Body parsed but is not a feature collection
    #[error("invalid feed envelope: {0}")]
    InvalidEnvelope(String),
}

impl FeedError {
    /// True for transport and status failures.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// True for malformed bodies and envelopes.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::InvalidEnvelope(_))
    }
}

/// Errors for a single feature entry. These skip the record, never the pass.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Entry is not shaped like a feature
    #[error("malformed feature: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Magnitude is null or absent
    #[error("missing magnitude")]
    MissingMagnitude,

    /// Fewer than three coordinates
    #[error("expected 3 coordinates, got {0}")]
    Coordinates(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let status = FeedError::Status {
            status: 404,
            message: "Not Found".into(),
        };
        assert!(status.is_fetch());
        assert!(!status.is_parse());

        let envelope = FeedError::InvalidEnvelope("expected FeatureCollection".into());
        assert!(envelope.is_parse());
        assert!(!envelope.is_fetch());

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(FeedError::from(json).is_parse());
    }

    #[test]
    fn test_status_message() {
        let err = FeedError::Status {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.to_string(), "feed returned HTTP 503: down");
    }
}
