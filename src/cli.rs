//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::client::FeedType;
use crate::output::Format;

/// Live earthquake map, colored by depth and sized by magnitude.
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
    /// Serve the interactive map
    Serve(ServeArgs),

    /// Render the map once to a static HTML file
    Render(RenderArgs),

    /// Print the styled markers (one-shot fetch and exit)
    Markers(MarkersArgs),
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Feed type to map
    #[arg(long, default_value = "all_week", value_parser = parse_feed_type)]
    pub feed: FeedType,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Feed type to map
    #[arg(long, default_value = "all_week", value_parser = parse_feed_type)]
    pub feed: FeedType,

    /// Where to write the page
    #[arg(long, short = 'o', default_value = "index.html")]
    pub output: PathBuf,
}

/// Arguments for the `markers` command.
#[derive(Parser, Debug)]
pub struct MarkersArgs {
    /// Feed type to fetch
    #[arg(long, default_value = "all_week", value_parser = parse_feed_type)]
    pub feed: FeedType,

    /// Maximum number of markers to show
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: usize,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Parse a feed type from string.
fn parse_feed_type(s: &str) -> Result<FeedType, String> {
    s.parse()
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["quakemap", "serve"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 8080);
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.feed, FeedType::AllWeek);
        assert!(!args.open);
    }

    #[test]
    fn test_markers_args() {
        let cli = Cli::parse_from([
            "quakemap", "--verbose", "markers", "--feed", "4.5_day", "-n", "5", "-f", "ndjson",
        ]);
        assert!(cli.verbose);
        let Command::Markers(args) = cli.command else {
            panic!("expected markers");
        };
        assert_eq!(args.feed, FeedType::Mag45Day);
        assert_eq!(args.limit, 5);
        assert_eq!(args.format, Format::Ndjson);
    }

    #[test]
    fn test_rejects_unknown_feed() {
        assert!(Cli::try_parse_from(["quakemap", "render", "--feed", "all_year"]).is_err());
    }
}
