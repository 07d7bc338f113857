//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing. Defaults reproduce the
//! stock page: the all-week USGS feed over an OpenStreetMap world view.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::client::FeedType;
use crate::surface::ControlPosition;

/// Plot the live USGS earthquake feed on an interactive map.
#[derive(Parser, Debug)]
#[command(name = "quakemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the feed once and write a standalone HTML map
    Render(RenderArgs),

    /// Serve the map, re-rendering on every page load
    Serve(ServeArgs),
}

/// Options shared by every command that draws a map.
#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    /// Summary feed to plot
    #[arg(long, default_value = "all_week", value_parser = parse_feed_type)]
    pub feed: FeedType,

    /// Fetch this GeoJSON URL instead of a named feed
    #[arg(long)]
    pub url: Option<String>,

    /// Show popup times in the local zone instead of UTC
    #[arg(long)]
    pub local_time: bool,

    /// Corner for the depth legend
    #[arg(long, default_value = "bottomright", value_parser = parse_position)]
    pub legend: ControlPosition,

    /// Page title
    #[arg(long, default_value = crate::DEFAULT_TITLE)]
    pub title: String,
}

impl MapArgs {
    /// The endpoint to fetch.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.url.clone().unwrap_or_else(|| self.feed.url())
    }
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Output file, or `-` for stdout
    #[arg(long, short = 'o', default_value = "quakemap.html")]
    pub out: PathBuf,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Parse a feed type from string.
fn parse_feed_type(s: &str) -> Result<FeedType, String> {
    s.parse()
}

/// Parse a legend corner from string.
fn parse_position(s: &str) -> Result<ControlPosition, String> {
    match s.to_lowercase().replace(['-', '_'], "").as_str() {
        "topleft" => Ok(ControlPosition::TopLeft),
        "topright" => Ok(ControlPosition::TopRight),
        "bottomleft" => Ok(ControlPosition::BottomLeft),
        "bottomright" => Ok(ControlPosition::BottomRight),
        _ => Err(format!(
            "unknown position: {s} (expected: topleft, topright, bottomleft, bottomright)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Period, Threshold};

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["quakemap", "render"]).unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.map.feed, FeedType::new(Threshold::All, Period::Week));
        assert_eq!(
            args.map.endpoint(),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"
        );
        assert_eq!(args.map.legend, ControlPosition::BottomRight);
        assert!(!args.map.local_time);
        assert_eq!(args.out, PathBuf::from("quakemap.html"));
    }

    #[test]
    fn test_url_overrides_feed() {
        let cli = Cli::try_parse_from([
            "quakemap",
            "serve",
            "--feed",
            "4.5_day",
            "--url",
            "http://localhost:9000/quakes.json",
            "--legend",
            "top-left",
        ])
        .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.map.feed, FeedType::new(Threshold::M4_5, Period::Day));
        assert_eq!(args.map.endpoint(), "http://localhost:9000/quakes.json");
        assert_eq!(args.map.legend, ControlPosition::TopLeft);
        assert_eq!(args.port, 8080);
    }

    #[test]
    fn test_bad_feed_rejected() {
        assert!(Cli::try_parse_from(["quakemap", "render", "--feed", "yearly"]).is_err());
    }
}
