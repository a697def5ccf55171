//! Serve command implementation.

use std::sync::Arc;

use crate::cli::args::{Cli, ServeArgs};
use crate::core::http::HttpFetcher;
use crate::core::pipeline::BadgePipeline;
use crate::core::resolver::RubyGemsResolver;
use crate::error::Result;
use crate::server;
use crate::storage::config::{ConfigOverrides, ResolvedConfig};

/// Execute the serve command; runs until ctrl-c.
///
/// # Errors
///
/// Returns error on invalid configuration or if the socket cannot be bound.
pub async fn execute(cli: &Cli, args: &ServeArgs) -> Result<()> {
    let config = ResolvedConfig::resolve(&ConfigOverrides::from_cli(cli, args.listen.as_deref()))?;
    tracing::debug!(
        listen = %config.listen,
        listen_source = %config.sources.listen,
        badge_url = %config.badge_url,
        badge_url_source = %config.sources.badge_url,
        rubygems_url = %config.rubygems_url,
        "Resolved configuration"
    );

    let fetcher = HttpFetcher::new(config.badge_timeout)?;
    let resolver = RubyGemsResolver::new(&config.rubygems_url, config.rubygems_timeout)?;
    let pipeline = Arc::new(BadgePipeline::new(fetcher, resolver, config.badge_url.clone()));

    let listener = server::bind(config.listen).await?;
    eprintln!("dlbadge listening on http://{}", config.listen);

    server::serve(listener, pipeline, async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Could not install ctrl-c handler; stop the process to shut down");
            std::future::pending::<()>().await;
        }
    })
    .await;
    Ok(())
}
