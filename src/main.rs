//! quakemap - the live USGS earthquake feed on an interactive map.
//!
//! Fetches a GeoJSON summary feed, sizes each event by magnitude, colors
//! it by depth, and emits a Leaflet page with a depth legend.

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

mod cli;
mod client;
mod errors;
mod leaflet;
mod models;
mod renderer;
mod server;
mod style;
mod surface;

use cli::{Cli, Command, MapArgs};
use client::FeedLoader;
use leaflet::LeafletPage;
use renderer::{RenderConfig, Renderer, TimeDisplay};

/// Title used when none is given.
pub(crate) const DEFAULT_TITLE: &str = "USGS Earthquakes";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    let runtime = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    match cli.command {
        Command::Render(args) => runtime.block_on(cmd_render(args)),
        Command::Serve(args) => runtime.block_on(cmd_serve(args)),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Build the loader and render configuration from shared map options.
fn map_setup(args: &MapArgs) -> Result<(FeedLoader, RenderConfig)> {
    let loader = FeedLoader::new(args.endpoint()).context("failed to create feed client")?;
    let config = RenderConfig {
        legend_position: args.legend,
        time_display: if args.local_time {
            TimeDisplay::Local
        } else {
            TimeDisplay::Utc
        },
        ..RenderConfig::default()
    };
    Ok((loader, config))
}

/// Execute the `render` command - one pass written to a file.
async fn cmd_render(args: cli::RenderArgs) -> Result<()> {
    let (loader, config) = map_setup(&args.map)?;
    let renderer = Renderer::new(config);

    let mut page = LeafletPage::new();
    renderer
        .render(&loader, &mut page)
        .await
        .context("failed to load earthquake feed")?;

    let markers = page.marker_count();
    let html = page.into_html(&args.map.title);
    if args.out.as_os_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(html.as_bytes())?;
        handle.flush()?;
    } else {
        fs::write(&args.out, html)
            .with_context(|| format!("failed to write {}", args.out.display()))?;
        info!("wrote {} with {markers} markers", args.out.display());
    }

    Ok(())
}

/// Execute the `serve` command - start the web server.
async fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    let (loader, render) = map_setup(&args.map)?;
    let config = server::ServerConfig {
        port: args.port,
        host: args.host.clone(),
        title: args.map.title.clone(),
        render,
    };

    // Print startup message
    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🌍 quakemap\x1b[0m");
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("  Local:   \x1b[96m{url}\x1b[0m");
    println!("  Feed:    {}", loader.url());
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("\x1b[2mPress Ctrl+C to stop\x1b[0m\n");

    // Open browser if requested (using xdg-open/open command)
    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    server::run_server(config, loader).await
}
