//! dlbadge - download-count badge proxy
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use dlbadge::cli::{Cli, Commands};
use dlbadge::core::logging;
use dlbadge::storage::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A broken config file is reported by the command itself; here it only
    // contributes logging defaults when readable.
    let file_config = Config::load_with_override(cli.config.as_deref()).ok();

    let defaults = file_config
        .as_ref()
        .map(Config::log_defaults)
        .unwrap_or_default();
    let settings = logging::LogSettings::resolve(
        &logging::LogArgs {
            level: cli.log_level.as_deref(),
            json: cli.json_output,
            verbose: cli.verbose,
        },
        defaults,
    );
    logging::init(&settings);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e);
            eprintln!("Error [{}]: {e}", e.error_code());
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: &Cli) -> dlbadge::Result<()> {
    match &cli.command {
        None => {
            print_quickstart();
            Ok(())
        }
        Some(Commands::Serve(args)) => dlbadge::cli::serve::execute(cli, args).await,
        Some(Commands::Url(args)) => dlbadge::cli::url::execute(cli, args),
        Some(Commands::Render(args)) => dlbadge::cli::render::execute(cli, args).await,
    }
}

/// Print quickstart help when no command is given.
fn print_quickstart() {
    println!(
        r#"dlbadge - download-count badge proxy

USAGE:
    dlbadge [OPTIONS] <COMMAND>

COMMANDS:
    serve    Run the badge HTTP server
    url      Print the badge service URL for a known count
    render   Resolve a gem's downloads and write its badge

QUICK START:
    dlbadge serve --listen 0.0.0.0:8080
    curl http://localhost:8080/downloads/rails?type=total
    dlbadge url --count 1234 --query "style=social&link=https://a&link=https://b"
    dlbadge render rails stable --output rails.svg

For more help: dlbadge --help
"#
    );
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
