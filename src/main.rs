//! quakemap - Live earthquake map from your terminal.
//!
//! Fetches the USGS earthquake feed, sizes each event by magnitude and
//! colors it by depth, and serves the result as an interactive Leaflet map
//! with switchable base layers and a depth legend.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::error;

mod cli;
mod client;
mod config;
mod errors;
mod layers;
mod legend;
mod models;
mod output;
mod page;
mod server;
mod style;
mod view;

use cli::{Cli, Command};
use client::UsgsClient;
use config::AccessToken;
use output::OutputMarker;
use view::MapComposer;

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

    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Render(args) => cmd_render(args),
        Command::Markers(args) => cmd_markers(args),
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

/// Build a composer from the tile credential. Fails before any network I/O.
fn composer_from_env() -> Result<MapComposer> {
    let token = AccessToken::from_env().context("cannot render map tiles")?;
    Ok(MapComposer::new(token))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to create tokio runtime")
}

/// Execute the `serve` command - start the map server.
fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    let composer = composer_from_env()?;

    let config = server::ServerConfig {
        port: args.port,
        host: args.host.clone(),
        feed_type: args.feed,
    };

    // Print startup message
    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🌍 quakemap\x1b[0m");
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("  Local:   \x1b[96m{url}\x1b[0m");
    println!("  Feed:    {}", args.feed.as_str());
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

    runtime()?.block_on(server::run_server(config, composer))
}

/// Execute the `render` command - write one render pass to a file.
fn cmd_render(args: cli::RenderArgs) -> Result<()> {
    let composer = composer_from_env()?;
    let client = UsgsClient::new().context("failed to create USGS client")?;

    let view = runtime()?.block_on(async {
        let loaded = client.load_events(args.feed).await;
        composer.compose(loaded, &Local)
    })?;

    let html = page::render_page(&view)?;
    std::fs::write(&args.output, html)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!("wrote map to {}", args.output.display());
    Ok(())
}

/// Execute the `markers` command - print styled markers.
fn cmd_markers(args: cli::MarkersArgs) -> Result<()> {
    let client = UsgsClient::new().context("failed to create USGS client")?;

    let mut events = runtime()?
        .block_on(client.load_events(args.feed))
        .context("failed to fetch earthquake feed")?;
    events.truncate(args.limit);

    let markers = style::style_events(&events, &Local);
    let rows: Vec<OutputMarker<'_>> = events
        .iter()
        .zip(&markers)
        .map(|(event, marker)| OutputMarker::new(event, marker))
        .collect();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_markers(&mut handle, &rows, args.format)?;
    handle.flush()?;

    Ok(())
}
