//! Download count resolution against the RubyGems API.
//!
//! The badge core only sees an `Option<u64>`; everything that can go wrong
//! here (unknown gem, unknown version, network trouble) collapses to `None`
//! after being logged.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::http::{DEFAULT_TIMEOUT, build_client, fetch_json};
use super::params::RequestParams;
use crate::error::{BadgeError, Result};

/// Public RubyGems instance.
pub const DEFAULT_RUBYGEMS_URL: &str = "https://rubygems.org";

/// Which download figure to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// All-time downloads across every version.
    Total,
    /// Downloads of the newest non-prerelease version.
    Stable,
    /// Downloads of one specific version.
    Exact(String),
}

impl VersionSelector {
    /// Selector for an optional version path segment.
    ///
    /// A missing segment or the literal `stable` selects the latest stable
    /// version; `type=total` in the query overrides both.
    #[must_use]
    pub fn from_request(version: Option<&str>, params: &RequestParams) -> Self {
        if params
            .get_non_blank("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("total"))
        {
            return Self::Total;
        }
        match version.map(str::trim).filter(|v| !v.is_empty()) {
            None => Self::Stable,
            Some(v) if v.eq_ignore_ascii_case("stable") => Self::Stable,
            Some(v) => Self::Exact(v.to_string()),
        }
    }
}

/// A gem plus the figure to resolve for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    pub gem: String,
    pub version: VersionSelector,
}

impl CountQuery {
    /// Validate the gem name and build a query.
    ///
    /// # Errors
    ///
    /// Returns [`BadgeError::InvalidGemName`] if the name contains anything
    /// outside `[A-Za-z0-9._-]`.
    pub fn new(gem: &str, version: VersionSelector) -> Result<Self> {
        validate_gem_name(gem)?;
        Ok(Self {
            gem: gem.to_string(),
            version,
        })
    }
}

/// Checks a gem name against the characters RubyGems accepts.
///
/// # Errors
///
/// Returns [`BadgeError::InvalidGemName`] for empty names or names with other
/// characters.
pub fn validate_gem_name(gem: &str) -> Result<()> {
    let valid = !gem.is_empty()
        && gem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(BadgeError::InvalidGemName(gem.to_string()))
    }
}

/// Resolves the download count shown on a badge.
///
/// Absence is a normal outcome and renders as an `invalid` badge.
pub trait DownloadCountResolver {
    fn resolve(&self, query: &CountQuery) -> impl Future<Output = Option<u64>> + Send;
}

#[derive(Debug, Deserialize)]
struct GemInfo {
    downloads: u64,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    number: String,
    downloads_count: u64,
    #[serde(default)]
    prerelease: bool,
}

/// [`DownloadCountResolver`] backed by the RubyGems JSON API.
#[derive(Debug, Clone)]
pub struct RubyGemsResolver {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RubyGemsResolver {
    /// Create a resolver with its own client.
    ///
    /// # Errors
    ///
    /// Returns error if client construction fails.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(build_client(timeout)?, base_url, timeout))
    }

    /// Resolver against rubygems.org with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if client construction fails.
    pub fn default_instance() -> Result<Self> {
        Self::new(DEFAULT_RUBYGEMS_URL, DEFAULT_TIMEOUT)
    }

    /// Reuse an existing client.
    #[must_use]
    pub fn with_client(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up the count, reporting why it could not be found.
    ///
    /// # Errors
    ///
    /// Returns error on network failure, non-success status, unparseable
    /// body, or when the requested version does not exist.
    pub async fn lookup(&self, query: &CountQuery) -> Result<u64> {
        match &query.version {
            VersionSelector::Total => {
                let url = format!("{}/api/v1/gems/{}.json", self.base_url, query.gem);
                let info: GemInfo = fetch_json(&self.client, &url, self.timeout).await?;
                Ok(info.downloads)
            }
            VersionSelector::Stable => {
                let versions = self.versions(&query.gem).await?;
                versions
                    .iter()
                    .find(|v| !v.prerelease)
                    .map(|v| v.downloads_count)
                    .ok_or_else(|| BadgeError::VersionNotFound {
                        gem: query.gem.clone(),
                        version: "stable".to_string(),
                    })
            }
            VersionSelector::Exact(number) => {
                let versions = self.versions(&query.gem).await?;
                versions
                    .iter()
                    .find(|v| &v.number == number)
                    .map(|v| v.downloads_count)
                    .ok_or_else(|| BadgeError::VersionNotFound {
                        gem: query.gem.clone(),
                        version: number.clone(),
                    })
            }
        }
    }

    async fn versions(&self, gem: &str) -> Result<Vec<VersionInfo>> {
        let url = format!("{}/api/v1/versions/{gem}.json", self.base_url);
        fetch_json(&self.client, &url, self.timeout).await
    }
}

impl DownloadCountResolver for RubyGemsResolver {
    async fn resolve(&self, query: &CountQuery) -> Option<u64> {
        match self.lookup(query).await {
            Ok(count) => {
                tracing::debug!(gem = %query.gem, version = ?query.version, count, "Resolved download count");
                Some(count)
            }
            Err(err) => {
                tracing::warn!(
                    gem = %query.gem,
                    version = ?query.version,
                    error = %err,
                    code = err.error_code(),
                    "Could not resolve download count"
                );
                None
            }
        }
    }
}
