//! Badge core: parameter normalization, URL assembly, fetch and fallback.

pub mod badge;
pub mod badge_url;
pub mod count;
pub mod fallback;
pub mod http;
pub mod label;
pub mod logging;
pub mod options;
pub mod params;
pub mod pipeline;
pub mod resolver;
pub mod social;

pub use badge::{BadgeRequest, Delivery, RequestState};
pub use badge_url::{DEFAULT_BADGE_SERVICE_URL, badge_query, build_badge_url};
pub use count::{DefaultNumberFormatter, INVALID_COUNT, NumberFormatter, format_number_of_downloads};
pub use fallback::{FallbackRenderer, SvgFallback};
pub use http::{BadgeFetcher, FetchOptions, HttpFetcher};
pub use label::{badge_path_field, clean_image_label};
pub use options::{
    BadgeOptions, DEFAULT_COLOR, DEFAULT_LABEL, DEFAULT_MAX_AGE, DEFAULT_STYLE, ImageExtension,
    MISSING_COUNT_COLOR, image_colour, image_extension, label_param, logo_padding_param,
    logo_param, logo_width_param, max_age_param, style_param,
};
pub use params::RequestParams;
pub use pipeline::{BadgeOutcome, BadgePipeline};
pub use resolver::{
    CountQuery, DEFAULT_RUBYGEMS_URL, DownloadCountResolver, RubyGemsResolver, VersionSelector,
};
pub use social::social_link_fragment;
