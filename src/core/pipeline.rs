//! Badge pipeline executor.
//!
//! Orchestrates one badge end to end: resolve the count, build the
//! [`BadgeRequest`], fetch and deliver.

use std::io::Write;
use std::time::Instant;

use super::badge::{BadgeRequest, Delivery};
use super::count::{DefaultNumberFormatter, NumberFormatter};
use super::fallback::{FallbackRenderer, SvgFallback};
use super::http::BadgeFetcher;
use super::params::RequestParams;
use super::resolver::{CountQuery, DownloadCountResolver, VersionSelector};
use crate::error::Result;

/// Result of rendering one badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeOutcome {
    /// What was written to the sink.
    pub delivery: Delivery,
    /// Media type of the written bytes.
    pub content_type: &'static str,
    /// Cache lifetime requested for the proxied badge, in seconds.
    pub max_age: u64,
    /// URL that was (or would have been) fetched.
    pub url: String,
    /// Resolved download count, if any.
    pub count: Option<u64>,
}

impl BadgeOutcome {
    /// `Cache-Control` value for this outcome.
    ///
    /// Fallback images are never cached so the real badge shows up as soon
    /// as the badge service recovers.
    #[must_use]
    pub fn cache_control(&self) -> String {
        if self.delivery.is_fallback() {
            "no-cache".to_string()
        } else {
            format!("max-age={}", self.max_age)
        }
    }
}

/// Shared collaborators for rendering badges.
///
/// Holds no per-request state; one instance serves every request.
#[derive(Debug, Clone)]
pub struct BadgePipeline<F, R, N = DefaultNumberFormatter> {
    fetcher: F,
    resolver: R,
    formatter: N,
    badge_base_url: String,
}

impl<F, R> BadgePipeline<F, R, DefaultNumberFormatter>
where
    F: BadgeFetcher,
    R: DownloadCountResolver,
{
    /// Pipeline using the default number formatter.
    pub fn new(fetcher: F, resolver: R, badge_base_url: impl Into<String>) -> Self {
        Self::with_formatter(fetcher, resolver, DefaultNumberFormatter, badge_base_url)
    }
}

impl<F, R, N> BadgePipeline<F, R, N>
where
    F: BadgeFetcher,
    R: DownloadCountResolver,
    N: NumberFormatter,
{
    pub fn with_formatter(
        fetcher: F,
        resolver: R,
        formatter: N,
        badge_base_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            resolver,
            formatter,
            badge_base_url: badge_base_url.into(),
        }
    }

    #[must_use]
    pub fn badge_base_url(&self) -> &str {
        &self.badge_base_url
    }

    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolve the count for `gem` and write its badge to `sink`.
    ///
    /// An unusable gem name is treated like an unknown gem: the badge renders
    /// as `invalid`.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `sink` fails.
    pub async fn render_gem<W>(
        &self,
        gem: &str,
        version: Option<&str>,
        params: RequestParams,
        sink: &mut W,
    ) -> Result<BadgeOutcome>
    where
        W: Write + ?Sized,
    {
        let selector = VersionSelector::from_request(version, &params);
        let count = match CountQuery::new(gem, selector) {
            Ok(query) => self.resolver.resolve(&query).await,
            Err(err) => {
                tracing::warn!(gem, error = %err, "Rejected gem name");
                None
            }
        };
        self.render_count(params, count, sink).await
    }

    /// Write the badge for an already known `count` to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `sink` fails.
    pub async fn render_count<W>(
        &self,
        params: RequestParams,
        count: Option<u64>,
        sink: &mut W,
    ) -> Result<BadgeOutcome>
    where
        W: Write + ?Sized,
    {
        let start = Instant::now();
        let request = BadgeRequest::new(params, count, &self.badge_base_url, &self.formatter);
        let fallback = SvgFallback::for_options(request.options(), request.format_number_of_downloads());
        let extension = request.image_extension();
        let max_age = request.max_age_param();
        let url = request.build_badge_url().to_string();

        let delivery = request.dispatch(&self.fetcher, &fallback, sink).await?;
        let content_type = if delivery.is_fallback() {
            fallback.content_type()
        } else {
            extension.content_type()
        };

        tracing::debug!(
            url = %url,
            fallback = delivery.is_fallback(),
            bytes = delivery.bytes_written(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Badge rendered"
        );

        Ok(BadgeOutcome {
            delivery,
            content_type,
            max_age,
            url,
            count,
        })
    }
}
