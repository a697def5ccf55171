//! Badge service URL assembly.
//!
//! Produces `{base}/badge/{label}-{value}-{color}.{ext}?{query}` where the
//! query only carries options that differ from the badge service defaults.

use url::form_urlencoded;

use super::label::badge_path_field;
use super::options::{BadgeOptions, DEFAULT_MAX_AGE, DEFAULT_STYLE};
use super::params::RequestParams;
use super::social::social_link_fragment;

/// Public shields.io instance.
pub const DEFAULT_BADGE_SERVICE_URL: &str = "https://img.shields.io";

/// Query string for the non-default display options, in a fixed order.
#[must_use]
pub fn badge_query(options: &BadgeOptions) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if !options.logo().is_empty() {
        query.append_pair("logo", options.logo());
    }
    if options.logo_width() != 0 {
        query.append_pair("logoWidth", &options.logo_width().to_string());
    }
    if options.logo_padding() != 0 {
        query.append_pair("logoPadding", &options.logo_padding().to_string());
    }
    if options.style() != DEFAULT_STYLE {
        query.append_pair("style", options.style());
    }
    if options.max_age() != DEFAULT_MAX_AGE {
        query.append_pair("maxAge", &options.max_age().to_string());
    }

    query.finish()
}

/// Full badge service URL for the given options and formatted count.
#[must_use]
pub fn build_badge_url(
    base_url: &str,
    options: &BadgeOptions,
    value: &str,
    params: &RequestParams,
) -> String {
    let mut url = format!(
        "{}/badge/{}-{}-{}.{}?{}",
        base_url.trim_end_matches('/'),
        badge_path_field(options.label()),
        badge_path_field(value),
        badge_path_field(options.color()),
        options.extension(),
        badge_query(options),
    );
    if let Some(fragment) = social_link_fragment(options.style(), params) {
        url.push_str(&fragment);
    }
    url
}
