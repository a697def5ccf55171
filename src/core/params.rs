//! Inbound query parameters.
//!
//! Parsed once per request with `application/x-www-form-urlencoded` rules.
//! Repeated keys keep every value in arrival order, which is what the social
//! badge `link` pair relies on.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Immutable, multiplicity-preserving view of a request's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    values: BTreeMap<String, Vec<String>>,
}

impl RequestParams {
    /// Parse a raw query string (without the leading `?`).
    #[must_use]
    pub fn parse(raw_query: Option<&str>) -> Self {
        let raw = raw_query.unwrap_or_default();
        Self::from_pairs(
            form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned())),
        )
    }

    /// Build from already decoded key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_default().push(value.into());
        }
        Self { values }
    }

    /// First value for `key`, exactly as supplied.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|list| list.first())
            .map(String::as_str)
    }

    /// First value for `key`, trimmed, or `None` when absent or blank.
    #[must_use]
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Every value supplied for `key`, in arrival order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether `key` is set to a truthy value (`1`, `true`, `yes`, `on`).
    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get_non_blank(key).is_some_and(|v| {
            matches!(
                v.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }

    /// Whether no parameters were supplied at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
