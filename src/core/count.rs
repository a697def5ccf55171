//! Download count display.

use super::params::RequestParams;
use crate::util::format::{format_delimited, format_metric};

/// Value shown when no download count is available.
pub const INVALID_COUNT: &str = "invalid";
/// Digit group delimiter used when none is requested.
pub const DEFAULT_DELIMITER: &str = ",";

/// Turns a raw download count into badge text.
///
/// Receives the full parameter set so implementations can honor display
/// preferences such as metric suffixes.
pub trait NumberFormatter {
    fn format(&self, count: u64, params: &RequestParams) -> String;
}

/// Formatter driven by the `metric` and `delimiter` query parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNumberFormatter;

impl NumberFormatter for DefaultNumberFormatter {
    fn format(&self, count: u64, params: &RequestParams) -> String {
        if params.is_truthy("metric") {
            return format_metric(count);
        }
        let delimiter = params
            .get("delimiter")
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DELIMITER);
        format_delimited(count, delimiter)
    }
}

/// Badge value for an optional count: `invalid` when absent, otherwise
/// whatever the formatter produces.
#[must_use]
pub fn format_number_of_downloads<F>(count: Option<u64>, params: &RequestParams, formatter: &F) -> String
where
    F: NumberFormatter + ?Sized,
{
    count.map_or_else(
        || INVALID_COUNT.to_string(),
        |count| formatter.format(count, params),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl NumberFormatter for Fixed {
        fn format(&self, _count: u64, _params: &RequestParams) -> String {
            "many".to_string()
        }
    }

    #[test]
    fn absent_count_is_invalid() {
        let params = RequestParams::parse(Some("metric=true"));
        assert_eq!(
            format_number_of_downloads(None, &params, &DefaultNumberFormatter),
            "invalid"
        );
        assert_eq!(format_number_of_downloads(None, &params, &Fixed), "invalid");
    }

    #[test]
    fn present_count_is_delegated() {
        let params = RequestParams::default();
        assert_eq!(format_number_of_downloads(Some(7), &params, &Fixed), "many");
    }

    #[test]
    fn default_formatter_groups_digits() {
        let params = RequestParams::default();
        assert_eq!(DefaultNumberFormatter.format(1_234_567, &params), "1,234,567");
    }

    #[test]
    fn default_formatter_custom_delimiter() {
        let params = RequestParams::parse(Some("delimiter=."));
        assert_eq!(DefaultNumberFormatter.format(1_234, &params), "1.234");
    }

    #[test]
    fn default_formatter_metric() {
        let params = RequestParams::parse(Some("metric=1"));
        assert_eq!(DefaultNumberFormatter.format(1_234, &params), "1.2k");
    }
}
