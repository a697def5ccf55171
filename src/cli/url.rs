//! Url command implementation.

use serde::Serialize;

use crate::cli::args::{Cli, UrlArgs};
use crate::core::badge::BadgeRequest;
use crate::core::count::DefaultNumberFormatter;
use crate::core::params::RequestParams;
use crate::error::Result;
use crate::storage::config::{ConfigOverrides, ResolvedConfig};

/// Machine-readable description of a badge URL.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UrlReport {
    pub url: String,
    pub label: String,
    pub value: String,
    pub color: String,
    pub extension: String,
    pub style: String,
    pub max_age: u64,
}

impl UrlReport {
    #[must_use]
    pub fn from_request(request: &BadgeRequest) -> Self {
        let options = request.options();
        Self {
            url: request.build_badge_url().to_string(),
            label: options.label().to_string(),
            value: request.format_number_of_downloads().to_string(),
            color: options.color().to_string(),
            extension: options.extension().to_string(),
            style: options.style().to_string(),
            max_age: options.max_age(),
        }
    }
}

/// Build the badge request for `args` against `badge_url`.
#[must_use]
pub fn build_request(args: &UrlArgs, badge_url: &str) -> BadgeRequest {
    BadgeRequest::new(
        RequestParams::parse(args.query.as_deref()),
        args.count,
        badge_url,
        &DefaultNumberFormatter,
    )
}

/// Execute the url command.
///
/// # Errors
///
/// Returns error on invalid configuration or JSON serialization failure.
pub fn execute(cli: &Cli, args: &UrlArgs) -> Result<()> {
    let config = ResolvedConfig::resolve(&ConfigOverrides::from_cli(cli, None))?;
    let request = build_request(args, &config.badge_url);

    if args.json {
        let report = UrlReport::from_request(&request);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", request.build_badge_url());
    }
    Ok(())
}
