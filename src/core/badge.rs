//! Badge request builder and dispatch.
//!
//! A [`BadgeRequest`] is built once per inbound badge request. Construction
//! normalizes the display options, formats the count and assembles the badge
//! service URL; [`BadgeRequest::dispatch`] then performs the single fetch and
//! writes exactly one payload to the output sink:
//!
//! ```text
//! Idle -> Requesting -> Delivered
//!                    -> FallbackDelivered
//! ```
//!
//! Fetch failures are absorbed into the fallback path. Only a sink that
//! refuses the bytes is reported back to the caller.

use std::io::Write;

use super::badge_url::build_badge_url;
use super::count::{NumberFormatter, format_number_of_downloads};
use super::fallback::FallbackRenderer;
use super::http::{BadgeFetcher, FetchOptions};
use super::options::{BadgeOptions, ImageExtension};
use super::params::RequestParams;
use crate::error::Result;

/// Lifecycle of a badge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Built, nothing sent yet.
    Idle,
    /// Outbound fetch in flight.
    Requesting,
    /// Badge service body written to the sink.
    Delivered,
    /// Fallback image written to the sink.
    FallbackDelivered,
}

impl RequestState {
    /// Whether no further transition can happen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::FallbackDelivered)
    }
}

/// What ended up in the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The badge service body, verbatim.
    Proxied { bytes: usize },
    /// The fallback renderer's image, because the fetch failed.
    Fallback { bytes: usize, reason: String },
}

impl Delivery {
    /// Terminal state reached by this delivery.
    #[must_use]
    pub const fn state(&self) -> RequestState {
        match self {
            Self::Proxied { .. } => RequestState::Delivered,
            Self::Fallback { .. } => RequestState::FallbackDelivered,
        }
    }

    /// Whether the fallback image was written.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Number of bytes handed to the sink.
    #[must_use]
    pub const fn bytes_written(&self) -> usize {
        match self {
            Self::Proxied { bytes } | Self::Fallback { bytes, .. } => *bytes,
        }
    }
}

/// One badge request with every derived field computed up front.
#[derive(Debug, Clone)]
pub struct BadgeRequest {
    params: RequestParams,
    count: Option<u64>,
    options: BadgeOptions,
    value: String,
    url: String,
    state: RequestState,
}

impl BadgeRequest {
    /// Build the request for `params` and an already resolved `count`.
    pub fn new<F>(params: RequestParams, count: Option<u64>, base_url: &str, formatter: &F) -> Self
    where
        F: NumberFormatter + ?Sized,
    {
        let options = BadgeOptions::from_params(&params, count);
        let value = format_number_of_downloads(count, &params, formatter);
        let url = build_badge_url(base_url, &options, &value, &params);

        Self {
            params,
            count,
            options,
            value,
            url,
            state: RequestState::Idle,
        }
    }

    #[must_use]
    pub const fn params(&self) -> &RequestParams {
        &self.params
    }

    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        self.count
    }

    #[must_use]
    pub const fn options(&self) -> &BadgeOptions {
        &self.options
    }

    #[must_use]
    pub fn style_param(&self) -> &str {
        self.options.style()
    }

    #[must_use]
    pub const fn max_age_param(&self) -> u64 {
        self.options.max_age()
    }

    #[must_use]
    pub fn image_colour(&self) -> &str {
        self.options.color()
    }

    #[must_use]
    pub const fn image_extension(&self) -> ImageExtension {
        self.options.extension()
    }

    /// Badge value text (`invalid` when the count is missing).
    #[must_use]
    pub fn format_number_of_downloads(&self) -> &str {
        &self.value
    }

    /// Badge service URL this request will fetch.
    #[must_use]
    pub fn build_badge_url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn state(&self) -> RequestState {
        self.state
    }

    /// Fetch the badge once and write the result to `sink`.
    ///
    /// On fetch failure the fallback renderer's output is written instead,
    /// and the call still succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `sink` fails.
    pub async fn dispatch<F, R, W>(mut self, fetcher: &F, fallback: &R, sink: &mut W) -> Result<Delivery>
    where
        F: BadgeFetcher + ?Sized,
        R: FallbackRenderer + ?Sized,
        W: Write + ?Sized,
    {
        self.transition(RequestState::Requesting);
        tracing::debug!(url = %self.url, "Requesting badge");

        let options = FetchOptions::accepting(self.options.extension().content_type());
        let delivery = match fetcher.fetch(&self.url, &options).await {
            Ok(body) => {
                sink.write_all(&body)?;
                Delivery::Proxied { bytes: body.len() }
            }
            Err(err) => {
                tracing::warn!(url = %self.url, error = %err, "Badge service failed, serving fallback");
                let image = fallback.render_fallback_badge();
                sink.write_all(&image)?;
                Delivery::Fallback {
                    bytes: image.len(),
                    reason: err.to_string(),
                }
            }
        };
        sink.flush()?;

        self.transition(delivery.state());
        Ok(delivery)
    }

    fn transition(&mut self, next: RequestState) {
        tracing::trace!(from = ?self.state, to = ?next, "Badge request state");
        self.state = next;
    }
}
