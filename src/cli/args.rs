//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Download-count badge proxy for RubyGems.
#[derive(Parser, Debug)]
#[command(name = "dlbadge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Config file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Badge service base URL
    #[arg(long, value_name = "URL", global = true)]
    pub badge_url: Option<String>,

    /// RubyGems API base URL
    #[arg(long, value_name = "URL", global = true)]
    pub rubygems_url: Option<String>,

    /// Timeout for remote services in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the badge HTTP server
    Serve(ServeArgs),

    /// Print the badge service URL for a known count
    Url(UrlArgs),

    /// Resolve a gem's downloads and write its badge
    Render(RenderArgs),
}

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (e.g. 0.0.0.0:8080)
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,
}

/// Arguments for the `url` command.
#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Download count; omit to build the `invalid` badge
    #[arg(long, value_name = "N")]
    pub count: Option<u64>,

    /// Badge query string (e.g. "style=social&link=a&link=b")
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Print a JSON object instead of the bare URL
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Gem name
    pub gem: String,

    /// Gem version, or `stable` (default)
    #[arg(id = "gem_version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Badge query string (e.g. "metric=true&color=green")
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Write the badge to a file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
