//! Render command implementation.

use std::io::Write;

use anyhow::Context;

use crate::cli::args::{Cli, RenderArgs};
use crate::core::http::HttpFetcher;
use crate::core::params::RequestParams;
use crate::core::pipeline::BadgePipeline;
use crate::core::resolver::{RubyGemsResolver, validate_gem_name};
use crate::error::Result;
use crate::storage::config::{ConfigOverrides, ResolvedConfig};

/// Execute the render command.
///
/// The badge (or its fallback) is written to `--output` or stdout.
///
/// # Errors
///
/// Returns error on an unusable gem name, invalid configuration, or a
/// failed write.
pub async fn execute(cli: &Cli, args: &RenderArgs) -> Result<()> {
    validate_gem_name(&args.gem)?;
    let config = ResolvedConfig::resolve(&ConfigOverrides::from_cli(cli, None))?;

    let fetcher = HttpFetcher::new(config.badge_timeout)?;
    let resolver = RubyGemsResolver::new(&config.rubygems_url, config.rubygems_timeout)?;
    let pipeline = BadgePipeline::new(fetcher, resolver, config.badge_url);

    let mut body = Vec::new();
    let outcome = pipeline
        .render_gem(
            &args.gem,
            args.version.as_deref(),
            RequestParams::parse(args.query.as_deref()),
            &mut body,
        )
        .await?;

    if outcome.delivery.is_fallback() {
        tracing::warn!(url = %outcome.url, "Badge service unavailable, wrote fallback badge");
    }

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating output directory {}", parent.display()))?;
            }
            std::fs::write(path, &body).with_context(|| format!("writing badge to {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = body.len(), "Badge written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&body)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
