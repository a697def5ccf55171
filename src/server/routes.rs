//! Request routing and response building for the badge server.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use hyper::{Method, Response, StatusCode};

use crate::core::pipeline::BadgeOutcome;

/// Where a request path leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /health`
    Health,
    /// `GET /downloads/{gem}` or `GET /downloads/{gem}/{version}`
    Downloads { gem: String, version: Option<String> },
    NotFound,
}

impl Route {
    /// Match a request path (without query string).
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["health"] => Self::Health,
            ["downloads", gem] => Self::Downloads {
                gem: (*gem).to_string(),
                version: None,
            },
            ["downloads", gem, version] => Self::Downloads {
                gem: (*gem).to_string(),
                version: Some((*version).to_string()),
            },
            _ => Self::NotFound,
        }
    }
}

/// Whether the server answers this method at all.
#[must_use]
pub fn is_supported_method(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

/// Plain-text response with the given status.
#[must_use]
pub fn text(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// `405` listing the supported methods.
#[must_use]
pub fn method_not_allowed() -> Response<Full<Bytes>> {
    let mut response = text(StatusCode::METHOD_NOT_ALLOWED, "method not allowed\n");
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
    response
}

/// Badge response; the body is dropped for `HEAD` but the length is kept.
#[must_use]
pub fn badge(outcome: &BadgeOutcome, body: Vec<u8>, head_only: bool) -> Response<Full<Bytes>> {
    let length = body.len();
    let body = if head_only { Bytes::new() } else { Bytes::from(body) };

    let mut response = Response::new(Full::new(body));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(outcome.content_type));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    if let Ok(value) = HeaderValue::from_str(&outcome.cache_control()) {
        headers.insert(CACHE_CONTROL, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::badge::Delivery;

    #[test]
    fn routes() {
        assert_eq!(Route::from_path("/health"), Route::Health);
        assert_eq!(
            Route::from_path("/downloads/rails"),
            Route::Downloads {
                gem: "rails".to_string(),
                version: None
            }
        );
        assert_eq!(
            Route::from_path("/downloads/rails/7.1.0/"),
            Route::Downloads {
                gem: "rails".to_string(),
                version: Some("7.1.0".to_string())
            }
        );
        assert_eq!(Route::from_path("/"), Route::NotFound);
        assert_eq!(Route::from_path("/downloads"), Route::NotFound);
        assert_eq!(Route::from_path("/downloads/a/b/c"), Route::NotFound);
    }

    #[test]
    fn methods() {
        assert!(is_supported_method(&Method::GET));
        assert!(is_supported_method(&Method::HEAD));
        assert!(!is_supported_method(&Method::POST));
    }

    #[test]
    fn head_keeps_length_without_body() {
        let outcome = BadgeOutcome {
            delivery: Delivery::Proxied { bytes: 5 },
            content_type: "image/svg+xml",
            max_age: 60,
            url: String::new(),
            count: Some(1),
        };
        let response = badge(&outcome, b"<svg>".to_vec(), true);
        assert_eq!(response.headers()[CONTENT_LENGTH], "5");
        assert_eq!(response.headers()[CACHE_CONTROL], "max-age=60");
        assert_eq!(response.headers()[CONTENT_TYPE], "image/svg+xml");
    }

    #[test]
    fn method_not_allowed_lists_allow() {
        let response = method_not_allowed();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD");
    }
}
