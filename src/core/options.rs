//! Badge display option normalization.
//!
//! Every accessor is a pure function over [`RequestParams`] with a safe
//! default for each malformed or missing input. [`BadgeOptions`] evaluates
//! them once per request.

use std::fmt;
use std::str::FromStr;

use super::label::clean_image_label;
use super::params::RequestParams;

/// Default badge style.
pub const DEFAULT_STYLE: &str = "flat";
/// Default cache lifetime requested from the badge service, in seconds (30 days).
pub const DEFAULT_MAX_AGE: u64 = 2_592_000;
/// Default left-hand badge text.
pub const DEFAULT_LABEL: &str = "downloads";
/// Default right-hand badge color.
pub const DEFAULT_COLOR: &str = "blue";
/// Color used when no download count could be resolved.
pub const MISSING_COUNT_COLOR: &str = "lightgrey";

/// Image formats the badge service can render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageExtension {
    #[default]
    Svg,
    Png,
    Jpg,
    Gif,
    Json,
}

impl ImageExtension {
    /// All supported extensions.
    pub const ALL: &'static [Self] = &[Self::Svg, Self::Png, Self::Jpg, Self::Gif, Self::Json];

    /// File extension as used in the badge path.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Gif => "gif",
            Self::Json => "json",
        }
    }

    /// Media type served for this extension.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Json => "application/json",
        }
    }
}

impl FromStr for ImageExtension {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|ext| ext.as_str() == wanted)
            .ok_or(())
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Pure accessors
// =============================================================================

/// Badge style, `flat` unless a non-blank style was requested.
#[must_use]
pub fn style_param(params: &RequestParams) -> String {
    params
        .get_non_blank("style")
        .unwrap_or(DEFAULT_STYLE)
        .to_string()
}

/// Requested cache lifetime; input without leading digits yields the default.
#[must_use]
pub fn max_age_param(params: &RequestParams) -> u64 {
    params
        .get_non_blank("maxAge")
        .and_then(leading_integer)
        .unwrap_or(DEFAULT_MAX_AGE)
}

/// Logo name or data URI, empty when not requested.
#[must_use]
pub fn logo_param(params: &RequestParams) -> String {
    params.get_non_blank("logo").unwrap_or_default().to_string()
}

/// Logo width in pixels, 0 for anything non-numeric.
#[must_use]
pub fn logo_width_param(params: &RequestParams) -> u32 {
    pixel_param(params, "logoWidth")
}

/// Logo padding in pixels, 0 for anything non-numeric.
#[must_use]
pub fn logo_padding_param(params: &RequestParams) -> u32 {
    pixel_param(params, "logoPadding")
}

/// Sanitized left-hand badge text.
#[must_use]
pub fn label_param(params: &RequestParams) -> String {
    let cleaned = clean_image_label(params.get_non_blank("label").unwrap_or(DEFAULT_LABEL));
    if cleaned.is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        cleaned
    }
}

/// Right-hand badge color; grey whenever the count is missing.
#[must_use]
pub fn image_colour(params: &RequestParams, count: Option<u64>) -> String {
    if count.is_none() {
        return MISSING_COUNT_COLOR.to_string();
    }
    params
        .get_non_blank("color")
        .unwrap_or(DEFAULT_COLOR)
        .to_string()
}

/// Requested image extension, `svg` unless it is on the allow-list.
#[must_use]
pub fn image_extension(params: &RequestParams) -> ImageExtension {
    params
        .get_non_blank("extension")
        .and_then(|ext| ext.parse().ok())
        .unwrap_or_default()
}

fn pixel_param(params: &RequestParams, key: &str) -> u32 {
    params
        .get_non_blank(key)
        .and_then(leading_integer)
        .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
}

/// Parses the leading run of ASCII digits, saturating on overflow.
fn leading_integer(value: &str) -> Option<u64> {
    let digits: &str = value
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value, |end| &value[..end]);
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

// =============================================================================
// BadgeOptions
// =============================================================================

/// Display options for one badge request, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeOptions {
    style: String,
    max_age: u64,
    logo: String,
    logo_width: u32,
    logo_padding: u32,
    label: String,
    color: String,
    extension: ImageExtension,
}

impl BadgeOptions {
    /// Normalize every display option from the request parameters.
    #[must_use]
    pub fn from_params(params: &RequestParams, count: Option<u64>) -> Self {
        Self {
            style: style_param(params),
            max_age: max_age_param(params),
            logo: logo_param(params),
            logo_width: logo_width_param(params),
            logo_padding: logo_padding_param(params),
            label: label_param(params),
            color: image_colour(params, count),
            extension: image_extension(params),
        }
    }

    #[must_use]
    pub fn style(&self) -> &str {
        &self.style
    }

    #[must_use]
    pub const fn max_age(&self) -> u64 {
        self.max_age
    }

    #[must_use]
    pub fn logo(&self) -> &str {
        &self.logo
    }

    #[must_use]
    pub const fn logo_width(&self) -> u32 {
        self.logo_width
    }

    #[must_use]
    pub const fn logo_padding(&self) -> u32 {
        self.logo_padding
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub const fn extension(&self) -> ImageExtension {
        self.extension
    }

    /// Whether the social style with link buttons was requested.
    #[must_use]
    pub fn is_social(&self) -> bool {
        self.style == "social"
    }
}
