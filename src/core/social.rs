//! Link buttons for social-style badges.

use url::form_urlencoded;

use super::params::RequestParams;

/// Style that renders link buttons.
pub const SOCIAL_STYLE: &str = "social";

/// Query fragment carrying the two social links, e.g. `&link=a&link=b`.
///
/// Only produced for the `social` style with at least two `link` values;
/// extra values are ignored. A lone link would render a half-configured
/// badge, so it yields nothing.
#[must_use]
pub fn social_link_fragment(style: &str, params: &RequestParams) -> Option<String> {
    if style != SOCIAL_STYLE {
        return None;
    }

    match params.get_all("link") {
        [first, second, ..] => {
            let mut fragment = String::new();
            for link in [first, second] {
                fragment.push_str("&link=");
                fragment.extend(form_urlencoded::byte_serialize(link.as_bytes()));
            }
            Some(fragment)
        }
        _ => None,
    }
}
