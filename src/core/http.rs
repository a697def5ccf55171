//! HTTP client utilities.
//!
//! Provides the shared client builder, the JSON helper used by the count
//! resolver, and the [`BadgeFetcher`] collaborator the badge core calls.

use std::future::Future;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder};

use crate::error::{BadgeError, Result};

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent to every remote service.
pub const USER_AGENT: &str = concat!("dlbadge/", env!("CARGO_PKG_VERSION"));

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| BadgeError::Network(e.to_string()))
}

fn send_error(e: &reqwest::Error, timeout: Duration) -> BadgeError {
    if e.is_timeout() {
        BadgeError::Timeout(timeout.as_secs())
    } else {
        BadgeError::Network(e.to_string())
    }
}

/// Fetch JSON from a URL.
///
/// # Errors
///
/// Returns error on network failure, non-success status or JSON parse failure.
pub async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| send_error(&e, timeout))?;

    if !response.status().is_success() {
        return Err(BadgeError::UpstreamStatus {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| BadgeError::ParseResponse(e.to_string()))
}

/// Per-request options handed to a [`BadgeFetcher`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Value for the `Accept` header, if any.
    pub accept: Option<String>,
}

impl FetchOptions {
    /// Options asking for a specific media type.
    #[must_use]
    pub fn accepting(media_type: &str) -> Self {
        Self {
            accept: Some(media_type.to_string()),
        }
    }
}

/// Performs the single outbound badge request.
///
/// Implementations collapse every failure (transport, timeout, non-2xx) into
/// an `Err`; the badge core does not distinguish between them.
pub trait BadgeFetcher {
    fn fetch(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// [`BadgeFetcher`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with its own client.
    ///
    /// # Errors
    ///
    /// Returns error if client construction fails.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            timeout,
        })
    }
}

impl BadgeFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Vec<u8>> {
        let mut request = self.client.get(url);
        if let Some(accept) = &options.accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request
            .send()
            .await
            .map_err(|e| send_error(&e, self.timeout))?;

        if !response.status().is_success() {
            return Err(BadgeError::UpstreamStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| send_error(&e, self.timeout))?;
        Ok(body.to_vec())
    }
}
